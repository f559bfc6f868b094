//! The algebraic structures used to weight derivations and to aggregate the costs of discarded attacks.
//!
//! Weights are propagated from assumptions to derived atoms by a [`Semiring`],
//! and the weights of the attacks an extension chooses to discard are aggregated into a [`Cost`] by a [`Monoid`].
//! Both are selected by name through [`SemiringKind`] and [`MonoidKind`].

mod cost;
pub use cost::Cost;

mod monoid;
pub use monoid::BudgetDirection;
pub use monoid::CountMonoid;
pub use monoid::LexicographicMonoid;
pub use monoid::MaxMonoid;
pub use monoid::MinMonoid;
pub use monoid::Monoid;
pub use monoid::Monotonicity;
pub use monoid::SumMonoid;

mod registry;
pub(crate) use registry::lookup;
pub use registry::MonoidKind;
pub use registry::SemiringKind;
pub use registry::UnknownAlgebra;

mod semiring;
pub use semiring::ArcticSemiring;
pub use semiring::BottleneckCostSemiring;
pub use semiring::GodelSemiring;
pub use semiring::LukasiewiczSemiring;
pub use semiring::Semiring;
pub use semiring::TropicalSemiring;

mod weight;
pub use weight::Weight;
pub use weight::INF_TOKEN;
pub use weight::SUP_TOKEN;
