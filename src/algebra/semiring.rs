use super::Weight;
use std::fmt::Debug;

/// A trait for the algebraic structures used to propagate weights along derivations.
///
/// A semiring provides a disjunction (⊕), used to combine the alternative derivations of an atom,
/// and a conjunction (⊗), used to combine the weights of the atoms of a rule body.
/// Both operations must be associative and commutative, and admit their identity element.
///
/// In addition to the algebraic operations, each semiring defines the default weight given to assumptions and facts
/// which have no explicit weight.
/// This default weight is always a sentinel, and attacks carrying it cannot be discarded:
/// when no weight is given at all and the budget is set to the monoid identity, extensions match the ones of classical ABA.
pub trait Semiring: Debug + Send + Sync {
    /// Returns the name of the semiring.
    fn name(&self) -> &'static str;

    /// Combines two alternative derivations.
    fn disjunction(&self, a: Weight, b: Weight) -> Weight;

    /// Combines two joint derivations.
    fn conjunction(&self, a: Weight, b: Weight) -> Weight;

    /// Returns the identity element of the disjunction.
    fn disjunction_identity(&self) -> Weight;

    /// Returns the identity element of the conjunction.
    fn conjunction_identity(&self) -> Weight;

    /// Returns the weight given to the assumptions and facts without explicit weight.
    fn default_weight(&self) -> Weight;

    /// Maps a weight into the domain of the semiring.
    fn normalize(&self, w: Weight) -> Weight {
        w
    }

    /// Returns `true` iff an attack with this weight can never be discarded.
    fn is_unconditional(&self, w: Weight) -> bool {
        w == self.default_weight()
    }

    /// Returns `true` iff no disjunction can change this weight.
    ///
    /// Once an atom gets such a weight, adding new derivations to it cannot modify it.
    fn is_absorbing(&self, w: Weight) -> bool {
        self.disjunction(w, Weight::NegInf) == w && self.disjunction(w, Weight::PosInf) == w
    }
}

/// The Gödel semiring: `(max, min)` on nonnegative weights.
///
/// A derivation is as strong as its weakest premise, and an atom as strong as its strongest derivation.
/// The default weight is `#sup`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GodelSemiring;

impl Semiring for GodelSemiring {
    fn name(&self) -> &'static str {
        "godel"
    }

    fn disjunction(&self, a: Weight, b: Weight) -> Weight {
        a.max(b)
    }

    fn conjunction(&self, a: Weight, b: Weight) -> Weight {
        a.min(b)
    }

    fn disjunction_identity(&self) -> Weight {
        Weight::zero()
    }

    fn conjunction_identity(&self) -> Weight {
        Weight::PosInf
    }

    fn default_weight(&self) -> Weight {
        Weight::PosInf
    }
}

/// The tropical semiring: `(min, +)`.
///
/// The weight of a derivation is the sum of the weights of its premises, and an atom gets the weight of its cheapest derivation.
/// The default weight is `#sup`, which absorbs sums.
#[derive(Debug, Default, Clone, Copy)]
pub struct TropicalSemiring;

impl Semiring for TropicalSemiring {
    fn name(&self) -> &'static str {
        "tropical"
    }

    fn disjunction(&self, a: Weight, b: Weight) -> Weight {
        a.min(b)
    }

    fn conjunction(&self, a: Weight, b: Weight) -> Weight {
        a.plus(b, Weight::PosInf)
    }

    fn disjunction_identity(&self) -> Weight {
        Weight::PosInf
    }

    fn conjunction_identity(&self) -> Weight {
        Weight::zero()
    }

    fn default_weight(&self) -> Weight {
        Weight::PosInf
    }
}

/// The arctic semiring: `(max, +)`.
///
/// The weight of a derivation is the sum of the weights of its premises, and an atom gets the weight of its heaviest derivation.
/// The default weight is `#inf`, which absorbs sums.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArcticSemiring;

impl Semiring for ArcticSemiring {
    fn name(&self) -> &'static str {
        "arctic"
    }

    fn disjunction(&self, a: Weight, b: Weight) -> Weight {
        a.max(b)
    }

    fn conjunction(&self, a: Weight, b: Weight) -> Weight {
        a.plus(b, Weight::NegInf)
    }

    fn disjunction_identity(&self) -> Weight {
        Weight::NegInf
    }

    fn conjunction_identity(&self) -> Weight {
        Weight::zero()
    }

    fn default_weight(&self) -> Weight {
        Weight::NegInf
    }
}

/// The Łukasiewicz semiring: `(max, max(0, a + b - 1))` on `[0, 1]`.
///
/// Finite weights are clamped into `[0, 1]`.
/// The default weight is `#sup`, which behaves like `1` (the conjunction identity) when combined with finite weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct LukasiewiczSemiring;

impl Semiring for LukasiewiczSemiring {
    fn name(&self) -> &'static str {
        "lukasiewicz"
    }

    fn disjunction(&self, a: Weight, b: Weight) -> Weight {
        a.max(b)
    }

    fn conjunction(&self, a: Weight, b: Weight) -> Weight {
        match (self.normalize(a), self.normalize(b)) {
            (Weight::PosInf, other) | (other, Weight::PosInf) => other,
            (Weight::Finite(x), Weight::Finite(y)) => Weight::Finite((x + y - 1.).max(0.)),
            _ => Weight::zero(),
        }
    }

    fn disjunction_identity(&self) -> Weight {
        Weight::zero()
    }

    fn conjunction_identity(&self) -> Weight {
        Weight::Finite(1.)
    }

    fn default_weight(&self) -> Weight {
        Weight::PosInf
    }

    fn normalize(&self, w: Weight) -> Weight {
        match w {
            Weight::Finite(v) => Weight::Finite(v.clamp(0., 1.)),
            Weight::NegInf => Weight::zero(),
            Weight::PosInf => Weight::PosInf,
        }
    }
}

/// The bottleneck-cost semiring: `(min, max)`.
///
/// The cost of a derivation is the cost of its most expensive premise, and an atom gets the cost of its cheapest derivation.
/// The default weight is `#sup`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BottleneckCostSemiring;

impl Semiring for BottleneckCostSemiring {
    fn name(&self) -> &'static str {
        "bottleneck_cost"
    }

    fn disjunction(&self, a: Weight, b: Weight) -> Weight {
        a.min(b)
    }

    fn conjunction(&self, a: Weight, b: Weight) -> Weight {
        a.max(b)
    }

    fn disjunction_identity(&self) -> Weight {
        Weight::PosInf
    }

    fn conjunction_identity(&self) -> Weight {
        Weight::zero()
    }

    fn default_weight(&self) -> Weight {
        Weight::PosInf
    }
}
