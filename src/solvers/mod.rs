//! Solvers computing the extensions of weighted ABA frameworks.
//!
//! The entry points are [`WabaSolver`] and the [`solve`] function.
//! Candidates are enumerated by a backtracking search over the assumptions and over the attacks to discard;
//! each one is checked against a base semantics (conflict-free, admissible, complete or stable),
//! and the semantics relying on maximality are obtained by comparing the accepted candidates.

mod cancellation;
pub use cancellation::CancellationToken;

mod extension_enumerator;

mod grounded_computer;

mod maximality_filter;

mod semantics;
pub use semantics::Optimization;
pub use semantics::Semantics;

mod semantics_evaluator;

mod solve;
pub use solve::solve;
pub use solve::solve_with_names;
pub use solve::SolveError;
pub use solve::SolveOutcome;
pub use solve::WabaSolver;
