use super::{
    ArcticSemiring, BottleneckCostSemiring, BudgetDirection, CountMonoid, GodelSemiring,
    LexicographicMonoid, LukasiewiczSemiring, MaxMonoid, MinMonoid, Monoid, Semiring, SumMonoid,
    TropicalSemiring,
};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use thiserror::Error;

/// The error returned when a name does not refer to a registered semiring, monoid or semantics.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} \"{name}\" (expected one of: {expected})")]
pub struct UnknownAlgebra {
    /// The kind of object that was looked for.
    pub kind: &'static str,
    /// The unknown name.
    pub name: String,
    /// The registered names, comma separated.
    pub expected: String,
}

impl UnknownAlgebra {
    pub(crate) fn new<E>(kind: &'static str, name: &str) -> Self
    where
        E: IntoEnumIterator + AsRef<str>,
    {
        UnknownAlgebra {
            kind,
            name: name.to_string(),
            expected: E::iter()
                .map(|e| e.as_ref().to_string())
                .collect::<Vec<String>>()
                .join(", "),
        }
    }
}

/// Looks up a registered name in an enumeration deriving [`EnumString`], ignoring case.
pub(crate) fn lookup<E>(kind: &'static str, name: &str) -> Result<E, UnknownAlgebra>
where
    E: IntoEnumIterator + AsRef<str> + FromStr,
{
    E::from_str(&name.to_ascii_lowercase()).map_err(|_| UnknownAlgebra::new::<E>(kind, name))
}

/// The registered semirings.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::{SemiringKind, Weight};
/// let kind = SemiringKind::from_name("tropical").unwrap();
/// let semiring = kind.semiring();
/// assert_eq!(Weight::Finite(5.), semiring.conjunction(Weight::Finite(2.), Weight::Finite(3.)));
/// assert!(SemiringKind::from_name("foo").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
pub enum SemiringKind {
    /// See [`GodelSemiring`].
    #[strum(serialize = "godel")]
    Godel,
    /// See [`TropicalSemiring`].
    #[strum(serialize = "tropical")]
    Tropical,
    /// See [`ArcticSemiring`].
    #[strum(serialize = "arctic")]
    Arctic,
    /// See [`LukasiewiczSemiring`].
    #[strum(serialize = "lukasiewicz")]
    Lukasiewicz,
    /// See [`BottleneckCostSemiring`].
    #[strum(serialize = "bottleneck_cost")]
    BottleneckCost,
}

impl SemiringKind {
    /// Returns the semiring registered with this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownAlgebra> {
        lookup("semiring", name)
    }

    /// Returns the operations of this semiring.
    pub fn semiring(&self) -> Box<dyn Semiring> {
        match self {
            SemiringKind::Godel => Box::new(GodelSemiring),
            SemiringKind::Tropical => Box::new(TropicalSemiring),
            SemiringKind::Arctic => Box::new(ArcticSemiring),
            SemiringKind::Lukasiewicz => Box::new(LukasiewiczSemiring),
            SemiringKind::BottleneckCost => Box::new(BottleneckCostSemiring),
        }
    }
}

/// The registered monoids.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::{BudgetDirection, MonoidKind};
/// let kind = MonoidKind::from_name("min").unwrap();
/// assert_eq!(BudgetDirection::LowerBound, kind.monoid().default_direction());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
pub enum MonoidKind {
    /// See [`MaxMonoid`].
    #[strum(serialize = "max")]
    Max,
    /// See [`SumMonoid`].
    #[strum(serialize = "sum")]
    Sum,
    /// See [`MinMonoid`].
    #[strum(serialize = "min")]
    Min,
    /// See [`CountMonoid`].
    #[strum(serialize = "count")]
    Count,
    /// See [`LexicographicMonoid`].
    #[strum(serialize = "lex")]
    Lexicographic,
}

impl MonoidKind {
    /// Returns the monoid registered with this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownAlgebra> {
        lookup("monoid", name)
    }

    /// Returns the operations of this monoid.
    pub fn monoid(&self) -> Box<dyn Monoid> {
        match self {
            MonoidKind::Max => Box::new(MaxMonoid),
            MonoidKind::Sum => Box::new(SumMonoid),
            MonoidKind::Min => Box::new(MinMonoid),
            MonoidKind::Count => Box::new(CountMonoid),
            MonoidKind::Lexicographic => Box::new(LexicographicMonoid),
        }
    }
}

impl BudgetDirection {
    /// Returns the budget direction registered with this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownAlgebra> {
        lookup("budget direction", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semiring_names() {
        for kind in SemiringKind::iter() {
            assert_eq!(kind, SemiringKind::from_name(kind.as_ref()).unwrap());
            assert_eq!(kind.as_ref(), kind.semiring().name());
        }
    }

    #[test]
    fn test_monoid_names() {
        for kind in MonoidKind::iter() {
            assert_eq!(kind, MonoidKind::from_name(kind.as_ref()).unwrap());
            assert_eq!(kind.as_ref(), kind.monoid().name());
        }
    }

    #[test]
    fn test_unknown_semiring() {
        let err = SemiringKind::from_name("boolean").unwrap_err();
        assert_eq!("semiring", err.kind);
        assert_eq!("boolean", err.name);
        assert_eq!(
            r#"unknown semiring "boolean" (expected one of: godel, tropical, arctic, lukasiewicz, bottleneck_cost)"#,
            err.to_string()
        );
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(SemiringKind::Godel, SemiringKind::from_name("Godel").unwrap());
        assert_eq!(MonoidKind::Lexicographic, MonoidKind::from_name("LEX").unwrap());
    }

    #[test]
    fn test_unknown_monoid() {
        let err = MonoidKind::from_name("avg").unwrap_err();
        assert_eq!("monoid", err.kind);
    }

    #[test]
    fn test_budget_direction_names() {
        assert_eq!(
            BudgetDirection::UpperBound,
            BudgetDirection::from_name("upper").unwrap()
        );
        assert_eq!(
            BudgetDirection::LowerBound,
            BudgetDirection::from_name("lower").unwrap()
        );
        assert!(BudgetDirection::from_name("both").is_err());
    }
}
