//! Wabasolver is a solver for Weighted Assumption-Based Argumentation.
//!
//! A weighted ABA framework is made of assumptions, rules, contraries and weights.
//! The weights of the atoms supported by a set of assumptions are computed with a [semiring](algebra::Semiring),
//! and an extension may discard some of the attacks it receives or emits,
//! as long as the cost of the discarded attacks, aggregated by a [monoid](algebra::Monoid), respects a budget.
//!
//! Frameworks can be built programmatically (see [`WabaFramework`](waba::WabaFramework))
//! or read from a fact-based syntax (see [`WabaReader`](io::WabaReader)).
//! Extensions are computed by a [`WabaSolver`](solvers::WabaSolver).

#![warn(missing_docs)]

pub mod algebra;

pub mod io;

pub mod solvers;

pub mod utils;

pub mod waba;
