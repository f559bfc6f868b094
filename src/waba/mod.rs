//! Weighted Assumption-Based Argumentation frameworks.
//!
//! This module holds the data model ([`Language`], [`WabaFramework`], [`Extension`]),
//! the computation of the atoms supported by a set of assumptions ([`SupportComputer`]),
//! and the resolution of the attacks induced by these atoms.

pub(crate) mod attack_resolver;

mod extension;
pub use extension::Extension;
pub use extension::WeightedAttack;

mod language;
pub use language::Atom;
pub use language::Language;

mod support_computer;
pub(crate) use support_computer::SupportMap;
pub use support_computer::SupportComputer;
pub use support_computer::UnstableFixpoint;

mod waba_framework;
pub use waba_framework::Rule;
pub use waba_framework::WabaFramework;
