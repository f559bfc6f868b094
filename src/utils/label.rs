use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// The trait for atom labels.
///
/// Atoms may be labeled by any type implementing some traits allowing their use in maps and their display.
/// This trait is just a shortcut used to combine them.
///
/// Simple types like [usize], `&str` and [String] implement [LabelType].
///
/// The bounds `Send` and `Sync` allow frameworks to be shared between the threads of a parallel search.
pub trait LabelType: Clone + Debug + Display + Eq + Hash + Send + Sync {}
impl<T: Clone + Debug + Display + Eq + Hash + Send + Sync> LabelType for T {}
