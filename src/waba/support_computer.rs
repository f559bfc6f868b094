use super::{Atom, WabaFramework};
use crate::algebra::{Semiring, Weight};
use crate::utils::LabelType;
use anyhow::{Context, Result};
use thiserror::Error;

/// The error returned when support weights keep changing after the maximal number of passes.
///
/// This happens for weight cycles the semiring cannot stabilize, like a cycle of positive weights under the arctic semiring.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("support weights did not stabilize after {passes} passes")]
pub struct UnstableFixpoint {
    /// The number of passes performed before giving up.
    pub passes: usize,
}

/// The weights of the atoms supported by a set of assumptions, indexed by atom identifiers.
///
/// Unsupported atoms are associated with `None`.
pub(crate) type SupportMap = Vec<Option<Weight>>;

/// An object used to compute the atoms supported by a set of assumptions, together with their weights.
///
/// Supported atoms are computed by a fixpoint iteration.
/// The in assumptions are supported with their leaf weight (the explicit weight if any, or else the default weight of the semiring).
/// Then, each pass recomputes the weight of each rule head:
/// the weight of an applicable rule is the conjunction of the weights of its body atoms,
/// or the disjunction identity combined with the leaf weight of the head for facts;
/// the head gets the disjunction of the weights of its applicable rules, combined with its explicit weight if it has one.
/// The iteration stops as soon as a pass changes no weight.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::{GodelSemiring, Weight};
/// # use wabasolver::waba::{Language, SupportComputer, WabaFramework};
/// let language = Language::new_with_labels(&["a", "b", "c_a"]);
/// let mut framework = WabaFramework::new_with_language(language);
/// framework.new_assumption(&"a").unwrap();
/// framework.new_assumption(&"b").unwrap();
/// framework.set_contrary(&"a", &"c_a").unwrap();
/// framework.new_rule(&"c_a", &[&"b"]).unwrap();
/// framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
/// let semiring = GodelSemiring;
/// let computer = SupportComputer::new(&framework, &semiring);
/// let supported = computer.compute(&[&"b"]).unwrap();
/// assert_eq!(2, supported.len());
/// assert_eq!(&"c_a", supported[1].0.label());
/// assert_eq!(Weight::Finite(80.), supported[1].1);
/// ```
pub struct SupportComputer<'a, T>
where
    T: LabelType,
{
    framework: &'a WabaFramework<T>,
    semiring: &'a dyn Semiring,
    heads: Vec<usize>,
    max_passes: usize,
}

impl<'a, T> SupportComputer<'a, T>
where
    T: LabelType,
{
    /// Builds a new support computer for the provided framework and semiring.
    ///
    /// The maximal number of passes is the number of atoms plus the number of rules plus two.
    pub fn new(framework: &'a WabaFramework<T>, semiring: &'a dyn Semiring) -> Self {
        let heads = (0..framework.language().len())
            .filter(|i| !framework.rule_ids_by_head(*i).is_empty())
            .collect();
        SupportComputer {
            framework,
            semiring,
            heads,
            max_passes: framework.language().len() + framework.n_rules() + 2,
        }
    }

    /// Sets the maximal number of passes of the fixpoint iteration.
    pub fn set_max_passes(&mut self, max_passes: usize) {
        self.max_passes = max_passes;
    }

    /// Computes the atoms supported by the assumptions given by their labels.
    ///
    /// The result is sorted by atom identifiers.
    /// An error is returned if a label does not refer to an assumption, or if the weights do not stabilize (see [`UnstableFixpoint`]).
    pub fn compute(&self, assumptions: &[&T]) -> Result<Vec<(Atom<T>, Weight)>> {
        let mut in_assumptions = vec![false; self.framework.language().len()];
        for a in assumptions {
            if !self.framework.is_assumption(a)? {
                return Err(anyhow::anyhow!("atom {:?} is not an assumption", a));
            }
            let id = self.framework.language().get_atom(a)?.id();
            in_assumptions[id] = true;
        }
        let supported = self
            .compute_by_ids(&in_assumptions)
            .context("cannot compute the supported atoms")?;
        Ok(supported
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.map(|w| (self.framework.get_atom_by_id(i).clone(), w)))
            .collect())
    }

    /// Returns the weight an assumption or a fact gives to an atom.
    pub(crate) fn leaf_weight(&self, atom_id: usize) -> Weight {
        self.semiring.normalize(
            self.framework
                .weight_by_id(atom_id)
                .unwrap_or_else(|| self.semiring.default_weight()),
        )
    }

    /// Computes the atoms supported by the assumptions flagged in the provided slice (indexed by atom ids).
    pub(crate) fn compute_by_ids(
        &self,
        in_assumptions: &[bool],
    ) -> Result<SupportMap, UnstableFixpoint> {
        let mut supported = vec![None; self.framework.language().len()];
        for a in self.framework.assumption_ids() {
            if in_assumptions[*a] {
                supported[*a] = Some(self.leaf_weight(*a));
            }
        }
        let mut passes = 0;
        loop {
            let mut changed = false;
            for head in self.heads.iter() {
                let new_weight = self.head_weight(*head, &supported);
                if new_weight != supported[*head] {
                    supported[*head] = new_weight;
                    changed = true;
                }
            }
            passes += 1;
            if !changed {
                return Ok(supported);
            }
            if passes >= self.max_passes {
                return Err(UnstableFixpoint { passes });
            }
        }
    }

    fn head_weight(&self, head: usize, supported: &[Option<Weight>]) -> Option<Weight> {
        let s = self.semiring;
        let derivations = self
            .framework
            .rule_ids_by_head(head)
            .iter()
            .filter_map(|r| self.rule_weight(head, *r, supported));
        let derived = derivations.reduce(|acc, w| s.disjunction(acc, w))?;
        let with_explicit = match self.framework.weight_by_id(head) {
            Some(w) => s.disjunction(derived, s.normalize(w)),
            None => derived,
        };
        Some(s.normalize(with_explicit))
    }

    fn rule_weight(&self, head: usize, rule: usize, supported: &[Option<Weight>]) -> Option<Weight> {
        let s = self.semiring;
        let body = self.framework.rule_body_ids(rule);
        if body.is_empty() {
            return Some(s.disjunction(s.disjunction_identity(), self.leaf_weight(head)));
        }
        body.iter().try_fold(s.conjunction_identity(), |acc, b| {
            supported[*b].map(|w| s.conjunction(acc, w))
        })
    }
}
