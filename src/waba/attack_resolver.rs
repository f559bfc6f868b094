use super::support_computer::SupportMap;
use super::{Extension, WabaFramework, WeightedAttack};
use crate::algebra::{BudgetDirection, Cost, Monoid, Semiring, Weight};
use crate::utils::LabelType;
use thiserror::Error;

/// An attack from a supported contrary to an assumption, given by atom ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PotentialAttack {
    pub attacker: usize,
    pub attacked: usize,
    pub weight: Weight,
}

/// Lists the attacks induced by a support map, in the order of the assumptions.
pub(crate) fn potential_attacks<T>(
    framework: &WabaFramework<T>,
    supported: &[Option<Weight>],
) -> Vec<PotentialAttack>
where
    T: LabelType,
{
    framework
        .assumption_ids()
        .iter()
        .filter_map(|a| {
            let contrary = framework.contrary_id(*a)?;
            supported[contrary].map(|weight| PotentialAttack {
                attacker: contrary,
                attacked: *a,
                weight,
            })
        })
        .collect()
}

/// The reasons a set of discarded attacks is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum BudgetExceeded {
    #[error("attack {attacker}->{attacked} is unconditional and cannot be discarded")]
    Unconditional { attacker: usize, attacked: usize },
    #[error("cost {cost} does not respect the budget {budget}")]
    OutOfBudget { cost: Cost, budget: Weight },
}

/// The outcome of choosing a set of attacks to discard.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Resolution {
    pub successful: Vec<PotentialAttack>,
    pub discarded: Vec<PotentialAttack>,
    pub cost: Cost,
    pub defeated: Vec<bool>,
}

impl Resolution {
    /// Builds the extension corresponding to this resolution.
    pub(crate) fn to_extension<T>(
        &self,
        framework: &WabaFramework<T>,
        in_assumptions: &[bool],
        supported: &SupportMap,
    ) -> Extension<T>
    where
        T: LabelType,
    {
        let atom = |id: usize| framework.get_atom_by_id(id).clone();
        let mut assumptions = framework
            .assumption_ids()
            .iter()
            .filter(|a| in_assumptions[**a])
            .map(|a| atom(*a))
            .collect::<Vec<_>>();
        assumptions.sort_unstable_by_key(|a| a.id());
        let to_weighted = |attacks: &[PotentialAttack]| {
            let mut result = attacks
                .iter()
                .map(|att| WeightedAttack::new(atom(att.attacker), atom(att.attacked), att.weight))
                .collect::<Vec<_>>();
            result.sort_unstable_by(|a1, a2| {
                (a1.attacked().id(), a1.attacker().id(), a1.weight()).cmp(&(
                    a2.attacked().id(),
                    a2.attacker().id(),
                    a2.weight(),
                ))
            });
            result
        };
        Extension::new(
            assumptions,
            supported
                .iter()
                .enumerate()
                .filter_map(|(i, w)| w.map(|w| (atom(i), w)))
                .collect(),
            to_weighted(&self.successful),
            to_weighted(&self.discarded),
            self.cost.clone(),
        )
    }
}

/// An object used to split the potential attacks into successful and discarded ones, and to check the resulting cost against a budget.
///
/// Attacks whose weight is the default weight of the semiring are unconditional: discarding them is always rejected.
/// With no explicit weight and a budget equal to the monoid identity, extensions are then the ones of classical ABA.
pub(crate) struct AttackResolver<'a> {
    semiring: &'a dyn Semiring,
    monoid: &'a dyn Monoid,
    budget: Weight,
    direction: BudgetDirection,
}

impl<'a> AttackResolver<'a> {
    pub(crate) fn new(
        semiring: &'a dyn Semiring,
        monoid: &'a dyn Monoid,
        budget: Weight,
        direction: BudgetDirection,
    ) -> Self {
        AttackResolver {
            semiring,
            monoid,
            budget,
            direction,
        }
    }

    pub(crate) fn monoid(&self) -> &dyn Monoid {
        self.monoid
    }

    pub(crate) fn budget(&self) -> Weight {
        self.budget
    }

    pub(crate) fn direction(&self) -> BudgetDirection {
        self.direction
    }

    /// Returns `true` iff the attack may be discarded.
    pub(crate) fn is_discardable(&self, attack: &PotentialAttack) -> bool {
        !self.semiring.is_unconditional(attack.weight)
    }

    /// Returns `true` iff the attack can never be discarded, whatever the assumptions added to the current ones.
    pub(crate) fn is_definitely_undiscardable(&self, attack: &PotentialAttack) -> bool {
        !self.is_discardable(attack) && self.semiring.is_absorbing(attack.weight)
    }

    /// Splits the attacks according to the provided flags and computes the cost.
    ///
    /// The budget is not checked by this function; see [`AttackResolver::check_budget`].
    pub(crate) fn resolve(
        &self,
        n_atoms: usize,
        attacks: &[PotentialAttack],
        discarded: &[bool],
    ) -> Result<Resolution, BudgetExceeded> {
        let mut resolution = Resolution {
            successful: Vec::with_capacity(attacks.len()),
            discarded: Vec::new(),
            cost: self.monoid.identity(),
            defeated: vec![false; n_atoms],
        };
        for (attack, is_discarded) in attacks.iter().zip(discarded.iter()) {
            if *is_discarded {
                self.discard(&mut resolution, *attack)?;
            } else {
                resolution.defeated[attack.attacked] = true;
                resolution.successful.push(*attack);
            }
        }
        Ok(resolution)
    }

    /// Adds an attack to the discarded ones, updating the cost.
    ///
    /// An attack is identified by its attacker and its attacked assumption.
    /// If it is already discarded, its weight is replaced by the new one and it is charged once.
    pub(crate) fn discard(
        &self,
        resolution: &mut Resolution,
        attack: PotentialAttack,
    ) -> Result<(), BudgetExceeded> {
        if !self.is_discardable(&attack) {
            return Err(BudgetExceeded::Unconditional {
                attacker: attack.attacker,
                attacked: attack.attacked,
            });
        }
        let existing = resolution
            .discarded
            .iter()
            .position(|d| d.attacker == attack.attacker && d.attacked == attack.attacked);
        match existing {
            Some(i) if resolution.discarded[i].weight == attack.weight => {}
            Some(i) => {
                resolution.discarded[i].weight = attack.weight;
                let weights = resolution
                    .discarded
                    .iter()
                    .map(|d| d.weight)
                    .collect::<Vec<Weight>>();
                resolution.cost = self.monoid.aggregate(&weights);
            }
            None => {
                resolution.cost = self.monoid.combine(&resolution.cost, attack.weight);
                resolution.discarded.push(attack);
            }
        }
        Ok(())
    }

    /// Checks a cost against the budget.
    pub(crate) fn check_budget(&self, cost: &Cost) -> Result<(), BudgetExceeded> {
        if self.direction.is_respected_by(cost, self.budget) {
            Ok(())
        } else {
            Err(BudgetExceeded::OutOfBudget {
                cost: cost.clone(),
                budget: self.budget,
            })
        }
    }
}
