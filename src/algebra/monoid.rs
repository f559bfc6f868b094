use super::{Cost, Weight};
use std::fmt::Debug;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// The way a budget bounds the cost of an extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
pub enum BudgetDirection {
    /// The cost must not exceed the budget.
    #[strum(serialize = "upper")]
    UpperBound,
    /// The cost must be at least equal to the budget.
    #[strum(serialize = "lower")]
    LowerBound,
}

impl BudgetDirection {
    /// Returns `true` iff the provided cost respects the budget in this direction.
    ///
    /// The comparison is made on the primary weight of the cost (see [`Cost::primary`]).
    ///
    /// # Example
    ///
    /// ```
    /// # use wabasolver::algebra::{BudgetDirection, Cost, Weight};
    /// let cost = Cost::Scalar(Weight::Finite(80.));
    /// assert!(BudgetDirection::UpperBound.is_respected_by(&cost, Weight::Finite(80.)));
    /// assert!(!BudgetDirection::UpperBound.is_respected_by(&cost, Weight::zero()));
    /// assert!(BudgetDirection::LowerBound.is_respected_by(&cost, Weight::zero()));
    /// ```
    pub fn is_respected_by(&self, cost: &Cost, budget: Weight) -> bool {
        match self {
            BudgetDirection::UpperBound => cost.primary() <= budget,
            BudgetDirection::LowerBound => cost.primary() >= budget,
        }
    }
}

/// The direction in which costs vary when new attacks are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Monotonicity {
    /// Discarding an attack never decreases the cost.
    Increasing,
    /// Discarding an attack never increases the cost.
    Decreasing,
}

/// A trait for the algebraic structures used to aggregate the weights of the discarded attacks into a cost.
///
/// The identity is the cost of an extension that discards no attack.
/// Costs are built incrementally by combining the current cost with the weight of a newly discarded attack;
/// the order in which attacks are combined has no influence on the final cost.
pub trait Monoid: Debug + Send + Sync {
    /// Returns the name of the monoid.
    fn name(&self) -> &'static str;

    /// Returns the cost of an empty set of discarded attacks.
    fn identity(&self) -> Cost;

    /// Returns the cost obtained by discarding a new attack.
    fn combine(&self, cost: &Cost, w: Weight) -> Cost;

    /// Returns the budget direction used when the user does not provide one.
    fn default_direction(&self) -> BudgetDirection;

    /// Returns how costs vary when discarding attacks with the provided weights, if they vary in a single direction.
    fn monotonicity(&self, weights: &[Weight]) -> Option<Monotonicity>;

    /// Aggregates a collection of weights from the identity.
    fn aggregate(&self, weights: &[Weight]) -> Cost {
        weights
            .iter()
            .fold(self.identity(), |acc, w| self.combine(&acc, *w))
    }
}

/// The monoid keeping the heaviest discarded attack.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxMonoid;

impl Monoid for MaxMonoid {
    fn name(&self) -> &'static str {
        "max"
    }

    fn identity(&self) -> Cost {
        Cost::Scalar(Weight::zero())
    }

    fn combine(&self, cost: &Cost, w: Weight) -> Cost {
        Cost::Scalar(cost.primary().max(w))
    }

    fn default_direction(&self) -> BudgetDirection {
        BudgetDirection::UpperBound
    }

    fn monotonicity(&self, _weights: &[Weight]) -> Option<Monotonicity> {
        Some(Monotonicity::Increasing)
    }
}

/// The monoid summing the weights of the discarded attacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SumMonoid;

impl Monoid for SumMonoid {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn identity(&self) -> Cost {
        Cost::Scalar(Weight::zero())
    }

    fn combine(&self, cost: &Cost, w: Weight) -> Cost {
        Cost::Scalar(cost.primary().plus(w, Weight::PosInf))
    }

    fn default_direction(&self) -> BudgetDirection {
        BudgetDirection::UpperBound
    }

    fn monotonicity(&self, weights: &[Weight]) -> Option<Monotonicity> {
        if weights.iter().all(|w| *w >= Weight::zero()) {
            Some(Monotonicity::Increasing)
        } else if weights.iter().all(|w| *w <= Weight::zero()) {
            Some(Monotonicity::Decreasing)
        } else {
            None
        }
    }
}

/// The monoid keeping the lightest discarded attack.
///
/// Its identity is `#sup`, and it is naturally used with lower bounds:
/// the budget gives the minimal weight an attack must have to be discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinMonoid;

impl Monoid for MinMonoid {
    fn name(&self) -> &'static str {
        "min"
    }

    fn identity(&self) -> Cost {
        Cost::Scalar(Weight::PosInf)
    }

    fn combine(&self, cost: &Cost, w: Weight) -> Cost {
        Cost::Scalar(cost.primary().min(w))
    }

    fn default_direction(&self) -> BudgetDirection {
        BudgetDirection::LowerBound
    }

    fn monotonicity(&self, _weights: &[Weight]) -> Option<Monotonicity> {
        Some(Monotonicity::Decreasing)
    }
}

/// The monoid counting the discarded attacks, whatever their weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountMonoid;

impl Monoid for CountMonoid {
    fn name(&self) -> &'static str {
        "count"
    }

    fn identity(&self) -> Cost {
        Cost::Scalar(Weight::zero())
    }

    fn combine(&self, cost: &Cost, _w: Weight) -> Cost {
        Cost::Scalar(cost.primary().plus(Weight::Finite(1.), Weight::PosInf))
    }

    fn default_direction(&self) -> BudgetDirection {
        BudgetDirection::UpperBound
    }

    fn monotonicity(&self, _weights: &[Weight]) -> Option<Monotonicity> {
        Some(Monotonicity::Increasing)
    }
}

/// The monoid keeping all the discarded weights, compared level by level from the heaviest one.
///
/// Budgets apply to the heaviest discarded weight.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicographicMonoid;

impl Monoid for LexicographicMonoid {
    fn name(&self) -> &'static str {
        "lex"
    }

    fn identity(&self) -> Cost {
        Cost::Levels(vec![])
    }

    fn combine(&self, cost: &Cost, w: Weight) -> Cost {
        let mut levels = match cost {
            Cost::Levels(levels) => levels.clone(),
            Cost::Scalar(s) => vec![*s],
        };
        let position = levels.iter().position(|l| *l < w).unwrap_or(levels.len());
        levels.insert(position, w);
        Cost::Levels(levels)
    }

    fn default_direction(&self) -> BudgetDirection {
        BudgetDirection::UpperBound
    }

    fn monotonicity(&self, _weights: &[Weight]) -> Option<Monotonicity> {
        Some(Monotonicity::Increasing)
    }
}
