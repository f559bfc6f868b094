use super::Weight;
use std::fmt::Display;

/// The aggregated cost of the attacks discarded by an extension.
///
/// Most monoids aggregate weights into a single [`Weight`].
/// The lexicographic monoid keeps every discarded weight, sorted from the most significant (the greatest) to the least significant;
/// two such costs are compared level by level.
///
/// Costs produced by a single monoid are always of the same variant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cost {
    /// A cost aggregated into a single weight.
    Scalar(Weight),
    /// A lexicographic cost.
    Levels(Vec<Weight>),
}

impl Cost {
    /// Returns the most significant weight of this cost.
    ///
    /// This is the weight itself for scalar costs, and the greatest discarded weight for lexicographic costs
    /// (zero if no attack was discarded).
    /// Budgets are checked against this value.
    pub fn primary(&self) -> Weight {
        match self {
            Cost::Scalar(w) => *w,
            Cost::Levels(levels) => levels.first().copied().unwrap_or_else(Weight::zero),
        }
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Scalar(w) => write!(f, "{}", w),
            Cost::Levels(levels) => {
                write!(f, "[")?;
                for (i, w) in levels.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", w)?;
                }
                write!(f, "]")
            }
        }
    }
}
