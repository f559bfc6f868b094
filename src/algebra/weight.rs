use anyhow::{anyhow, Result};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The token used to write the positive infinite weight.
pub const SUP_TOKEN: &str = "#sup";

/// The token used to write the negative infinite weight.
pub const INF_TOKEN: &str = "#inf";

/// A weight, as handled by semirings and monoids.
///
/// The domain is a totally ordered set of finite numbers extended with two sentinels,
/// [`Weight::NegInf`] and [`Weight::PosInf`], such that `NegInf < Finite(x) < PosInf` for any `x`.
///
/// Finite values are never NaN; [`Weight::finite`] and the [`FromStr`] implementation reject it.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::Weight;
/// let w: Weight = "80".parse().unwrap();
/// assert_eq!(Weight::Finite(80.), w);
/// assert!(w < "#sup".parse::<Weight>().unwrap());
/// assert!(Weight::NegInf < w);
/// assert_eq!("#sup", Weight::PosInf.to_string());
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Weight {
    /// The negative infinite weight.
    NegInf,
    /// A finite weight.
    Finite(f64),
    /// The positive infinite weight.
    PosInf,
}

impl Weight {
    /// Builds a finite weight, returning an error for NaN values and mapping infinite floats to sentinels.
    pub fn finite(value: f64) -> Result<Self> {
        if value.is_nan() {
            Err(anyhow!("NaN is not a valid weight"))
        } else if value == f64::INFINITY {
            Ok(Weight::PosInf)
        } else if value == f64::NEG_INFINITY {
            Ok(Weight::NegInf)
        } else {
            Ok(Weight::Finite(value))
        }
    }

    /// The finite weight equal to zero.
    pub fn zero() -> Self {
        Weight::Finite(0.)
    }

    /// Returns `true` iff this weight is not a sentinel.
    pub fn is_finite(&self) -> bool {
        matches!(self, Weight::Finite(_))
    }

    /// Returns the finite value of this weight, or `None` for sentinels.
    pub fn value(&self) -> Option<f64> {
        match self {
            Weight::Finite(v) => Some(*v),
            _ => None,
        }
    }

    /// Adds two weights, using `absorbing` as the result when a sentinel is involved in an undefined sum.
    ///
    /// The absorbing sentinel wins over everything; the other sentinel wins over finite values.
    pub(crate) fn plus(self, other: Weight, absorbing: Weight) -> Weight {
        if self == absorbing || other == absorbing {
            return absorbing;
        }
        match (self, other) {
            (Weight::Finite(a), Weight::Finite(b)) => {
                Weight::finite(a + b).unwrap_or(absorbing)
            }
            (Weight::Finite(_), s) | (s, Weight::Finite(_)) => s,
            (s, _) => s,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Weight::NegInf => 0,
            Weight::Finite(_) => 1,
            Weight::PosInf => 2,
        }
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::zero()
    }
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Weight::Finite(a), Weight::Finite(b)) => {
                // -0.0 and 0.0 are the same weight
                if a == b {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Weight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        if let Weight::Finite(v) = self {
            let normalized = if *v == 0. { 0. } else { *v };
            normalized.to_bits().hash(state);
        }
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weight::NegInf => write!(f, "{}", INF_TOKEN),
            Weight::Finite(v) => write!(f, "{}", v),
            Weight::PosInf => write!(f, "{}", SUP_TOKEN),
        }
    }
}

impl FromStr for Weight {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            SUP_TOKEN | "inf" | "+inf" => Ok(Weight::PosInf),
            INF_TOKEN | "-inf" => Ok(Weight::NegInf),
            t => {
                let value = t
                    .parse::<f64>()
                    .map_err(|_| anyhow!(r#"invalid weight "{}""#, t))?;
                if value.is_infinite() {
                    return Err(anyhow!(
                        r#"invalid weight "{}"; use {} or {} for infinite weights"#,
                        t,
                        SUP_TOKEN,
                        INF_TOKEN
                    ));
                }
                Weight::finite(value)
            }
        }
    }
}

impl From<u32> for Weight {
    fn from(value: u32) -> Self {
        Weight::Finite(value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let mut weights = vec![
            Weight::PosInf,
            Weight::Finite(2.),
            Weight::NegInf,
            Weight::Finite(-3.5),
        ];
        weights.sort();
        assert_eq!(
            vec![
                Weight::NegInf,
                Weight::Finite(-3.5),
                Weight::Finite(2.),
                Weight::PosInf
            ],
            weights
        );
    }

    #[test]
    fn test_zeros_are_equal() {
        assert_eq!(Weight::Finite(0.), Weight::Finite(-0.));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Weight::PosInf, "#sup".parse().unwrap());
        assert_eq!(Weight::NegInf, "#inf".parse().unwrap());
        assert_eq!(Weight::Finite(-1.5), " -1.5 ".parse().unwrap());
        assert_eq!(Weight::Finite(50.), "50".parse().unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert!("foo".parse::<Weight>().is_err());
        assert!("NaN".parse::<Weight>().is_err());
        assert!("infinity".parse::<Weight>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!("#sup", Weight::PosInf.to_string());
        assert_eq!("#inf", Weight::NegInf.to_string());
        assert_eq!("80", Weight::Finite(80.).to_string());
        assert_eq!("0.5", Weight::Finite(0.5).to_string());
    }

    #[test]
    fn test_finite_rejects_nan() {
        assert!(Weight::finite(f64::NAN).is_err());
        assert_eq!(Weight::PosInf, Weight::finite(f64::INFINITY).unwrap());
    }

    #[test]
    fn test_plus() {
        let a = Weight::Finite(2.);
        let b = Weight::Finite(3.);
        assert_eq!(Weight::Finite(5.), a.plus(b, Weight::PosInf));
        assert_eq!(Weight::PosInf, a.plus(Weight::PosInf, Weight::PosInf));
        assert_eq!(Weight::NegInf, a.plus(Weight::NegInf, Weight::PosInf));
        assert_eq!(
            Weight::PosInf,
            Weight::NegInf.plus(Weight::PosInf, Weight::PosInf)
        );
        assert_eq!(
            Weight::NegInf,
            Weight::NegInf.plus(Weight::PosInf, Weight::NegInf)
        );
    }
}
