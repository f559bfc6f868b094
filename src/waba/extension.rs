use super::Atom;
use crate::algebra::{Cost, Weight};
use crate::utils::LabelType;
use std::fmt::Display;

/// An attack from a supported atom to an assumption, labeled by the weight of the attacking atom.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WeightedAttack<T>
where
    T: LabelType,
{
    attacker: Atom<T>,
    attacked: Atom<T>,
    weight: Weight,
}

impl<T> WeightedAttack<T>
where
    T: LabelType,
{
    pub(crate) fn new(attacker: Atom<T>, attacked: Atom<T>, weight: Weight) -> Self {
        WeightedAttack {
            attacker,
            attacked,
            weight,
        }
    }

    /// Returns the attacking atom, which is the contrary of the attacked assumption.
    pub fn attacker(&self) -> &Atom<T> {
        &self.attacker
    }

    /// Returns the attacked assumption.
    pub fn attacked(&self) -> &Atom<T> {
        &self.attacked
    }

    /// Returns the weight of the attack.
    pub fn weight(&self) -> Weight {
        self.weight
    }
}

impl<T> Display for WeightedAttack<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}:{}", self.attacker, self.attacked, self.weight)
    }
}

/// An extension, as computed by the solvers.
///
/// An extension is made of the assumptions it accepts, the atoms supported by these assumptions (with their weights),
/// the attacks that succeed, the attacks it chooses to discard and the cost of discarding them.
/// All collections are sorted by atom identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension<T>
where
    T: LabelType,
{
    assumptions: Vec<Atom<T>>,
    supported: Vec<(Atom<T>, Weight)>,
    successful_attacks: Vec<WeightedAttack<T>>,
    discarded_attacks: Vec<WeightedAttack<T>>,
    cost: Cost,
}

impl<T> Extension<T>
where
    T: LabelType,
{
    pub(crate) fn new(
        assumptions: Vec<Atom<T>>,
        supported: Vec<(Atom<T>, Weight)>,
        successful_attacks: Vec<WeightedAttack<T>>,
        discarded_attacks: Vec<WeightedAttack<T>>,
        cost: Cost,
    ) -> Self {
        Extension {
            assumptions,
            supported,
            successful_attacks,
            discarded_attacks,
            cost,
        }
    }

    /// Returns the accepted assumptions.
    pub fn assumptions(&self) -> &[Atom<T>] {
        &self.assumptions
    }

    /// Returns the labels of the accepted assumptions.
    pub fn assumption_labels(&self) -> Vec<&T> {
        self.assumptions.iter().map(|a| a.label()).collect()
    }

    /// Returns `true` iff the assumption with the provided label is accepted.
    pub fn contains(&self, label: &T) -> bool {
        self.assumptions.iter().any(|a| a.label() == label)
    }

    /// Returns the atoms supported by the accepted assumptions, with their weights.
    pub fn supported(&self) -> &[(Atom<T>, Weight)] {
        &self.supported
    }

    /// Returns the weight of an atom if it is supported.
    pub fn supported_weight(&self, label: &T) -> Option<Weight> {
        self.supported
            .iter()
            .find(|(a, _)| a.label() == label)
            .map(|(_, w)| *w)
    }

    /// Returns the attacks that are not discarded.
    pub fn successful_attacks(&self) -> &[WeightedAttack<T>] {
        &self.successful_attacks
    }

    /// Returns the attacks tolerated by this extension.
    pub fn discarded_attacks(&self) -> &[WeightedAttack<T>] {
        &self.discarded_attacks
    }

    /// Returns the aggregated cost of the discarded attacks.
    pub fn cost(&self) -> &Cost {
        &self.cost
    }
}
