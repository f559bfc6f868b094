use crate::waba::attack_resolver::{potential_attacks, AttackResolver, Resolution};
use crate::waba::{SupportComputer, UnstableFixpoint, WabaFramework};
use crate::utils::LabelType;

/// The acceptance conditions checked candidate by candidate.
///
/// The other semantics are built on top of them by comparing the accepted candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BaseSemantics {
    ConflictFree,
    Admissible,
    Complete,
    Stable,
}

/// The reason a candidate is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// An in assumption is defeated.
    Conflicting,
    /// An out assumption is not defeated.
    UndefeatedOutsider,
    /// An in assumption is attacked by the undefeated assumptions and the attack cannot be discarded.
    Undefended,
    /// An out assumption is defended.
    NotComplete,
    /// The cost does not respect the budget.
    OutOfBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// Checks the acceptance conditions of candidates.
///
/// Defeats are given by the successful attacks of the candidate.
/// For admissibility, the attacks against the in assumptions are computed from the assumptions the candidate does not defeat;
/// those attacks are threats that must be discarded, and their weights are charged to the cost of the candidate.
pub(crate) struct SemanticsEvaluator<'a, T>
where
    T: LabelType,
{
    framework: &'a WabaFramework<T>,
    support_computer: &'a SupportComputer<'a, T>,
    resolver: &'a AttackResolver<'a>,
}

impl<'a, T> SemanticsEvaluator<'a, T>
where
    T: LabelType,
{
    pub(crate) fn new(
        framework: &'a WabaFramework<T>,
        support_computer: &'a SupportComputer<'a, T>,
        resolver: &'a AttackResolver<'a>,
    ) -> Self {
        SemanticsEvaluator {
            framework,
            support_computer,
            resolver,
        }
    }

    /// Evaluates a candidate, updating its resolution with the discarded threats when needed.
    pub(crate) fn evaluate(
        &self,
        semantics: BaseSemantics,
        in_assumptions: &[bool],
        resolution: &mut Resolution,
    ) -> Result<Verdict, UnstableFixpoint> {
        let assumptions = self.framework.assumption_ids();
        if assumptions
            .iter()
            .any(|a| in_assumptions[*a] && resolution.defeated[*a])
        {
            return Ok(Verdict::Rejected(Rejection::Conflicting));
        }
        match semantics {
            BaseSemantics::ConflictFree => {}
            BaseSemantics::Stable => {
                if assumptions
                    .iter()
                    .any(|a| !in_assumptions[*a] && !resolution.defeated[*a])
                {
                    return Ok(Verdict::Rejected(Rejection::UndefeatedOutsider));
                }
            }
            BaseSemantics::Admissible | BaseSemantics::Complete => {
                let mut undefeated = vec![false; in_assumptions.len()];
                for a in assumptions {
                    undefeated[*a] = !resolution.defeated[*a];
                }
                let undefeated_support = self.support_computer.compute_by_ids(&undefeated)?;
                for threat in potential_attacks(self.framework, &undefeated_support)
                    .into_iter()
                    .filter(|att| in_assumptions[att.attacked])
                {
                    if self.resolver.discard(resolution, threat).is_err() {
                        return Ok(Verdict::Rejected(Rejection::Undefended));
                    }
                }
                if semantics == BaseSemantics::Complete
                    && assumptions.iter().any(|a| {
                        !in_assumptions[*a]
                            && self
                                .framework
                                .contrary_id(*a)
                                .map(|c| undefeated_support[c].is_none())
                                .unwrap_or(true)
                    })
                {
                    return Ok(Verdict::Rejected(Rejection::NotComplete));
                }
            }
        }
        if self.resolver.check_budget(&resolution.cost).is_err() {
            return Ok(Verdict::Rejected(Rejection::OutOfBudget));
        }
        Ok(Verdict::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{BudgetDirection, Cost, GodelSemiring, MaxMonoid, SumMonoid, Weight};
    use crate::waba::Language;

    struct Fixture {
        framework: WabaFramework<&'static str>,
        semiring: GodelSemiring,
        monoid: MaxMonoid,
    }

    impl Fixture {
        fn evaluate(
            &self,
            semantics: BaseSemantics,
            in_labels: &[&'static str],
            discarded_labels: &[&'static str],
            budget: Weight,
        ) -> Verdict {
            let support_computer = SupportComputer::new(&self.framework, &self.semiring);
            let resolver = AttackResolver::new(
                &self.semiring,
                &self.monoid,
                budget,
                BudgetDirection::UpperBound,
            );
            let evaluator = SemanticsEvaluator::new(&self.framework, &support_computer, &resolver);
            let language = self.framework.language();
            let mut in_assumptions = vec![false; language.len()];
            for l in in_labels {
                in_assumptions[language.get_atom(l).unwrap().id()] = true;
            }
            let supported = support_computer.compute_by_ids(&in_assumptions).unwrap();
            let attacks = potential_attacks(&self.framework, &supported);
            let discarded = attacks
                .iter()
                .map(|att| {
                    discarded_labels.contains(language.get_atom_by_id(att.attacked).label())
                })
                .collect::<Vec<bool>>();
            let mut resolution = resolver
                .resolve(language.len(), &attacks, &discarded)
                .unwrap();
            evaluator
                .evaluate(semantics, &in_assumptions, &mut resolution)
                .unwrap()
        }
    }

    fn scenario_two() -> Fixture {
        let l = Language::new_with_labels(&["a", "b", "c_a"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"b").unwrap();
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
        Fixture {
            framework,
            semiring: GodelSemiring,
            monoid: MaxMonoid,
        }
    }

    fn classical_chain() -> Fixture {
        // c attacks b, b attacks a
        let l = Language::new_with_labels(&["a", "b", "c", "c_a", "c_b"]);
        let mut framework = WabaFramework::new_with_language(l);
        for a in ["a", "b", "c"] {
            framework.new_assumption(&a).unwrap();
        }
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.set_contrary(&"b", &"c_b").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.new_rule(&"c_b", &[&"c"]).unwrap();
        Fixture {
            framework,
            semiring: GodelSemiring,
            monoid: MaxMonoid,
        }
    }

    #[test]
    fn test_conflicting() {
        let f = scenario_two();
        assert_eq!(
            Verdict::Rejected(Rejection::Conflicting),
            f.evaluate(BaseSemantics::ConflictFree, &["a", "b"], &[], Weight::PosInf)
        );
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::ConflictFree, &["a", "b"], &["a"], Weight::PosInf)
        );
        assert_eq!(
            Verdict::Rejected(Rejection::OutOfBudget),
            f.evaluate(BaseSemantics::ConflictFree, &["a", "b"], &["a"], Weight::zero())
        );
    }

    #[test]
    fn test_stable() {
        let f = scenario_two();
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::Stable, &["b"], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Rejected(Rejection::UndefeatedOutsider),
            f.evaluate(BaseSemantics::Stable, &["a"], &[], Weight::zero())
        );
    }

    #[test]
    fn test_admissible() {
        let f = classical_chain();
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::Admissible, &[], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::Admissible, &["a", "c"], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Rejected(Rejection::Undefended),
            f.evaluate(BaseSemantics::Admissible, &["a"], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Rejected(Rejection::Undefended),
            f.evaluate(BaseSemantics::Admissible, &["b"], &[], Weight::zero())
        );
    }

    #[test]
    fn test_complete() {
        let f = classical_chain();
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::Complete, &["a", "c"], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Rejected(Rejection::NotComplete),
            f.evaluate(BaseSemantics::Complete, &["c"], &[], Weight::zero())
        );
        assert_eq!(
            Verdict::Rejected(Rejection::NotComplete),
            f.evaluate(BaseSemantics::Complete, &[], &[], Weight::zero())
        );
    }

    #[test]
    fn test_weighted_threat_is_charged() {
        let f = scenario_two();
        assert_eq!(
            Verdict::Rejected(Rejection::OutOfBudget),
            f.evaluate(BaseSemantics::Admissible, &["a"], &[], Weight::Finite(79.))
        );
        assert_eq!(
            Verdict::Accepted,
            f.evaluate(BaseSemantics::Admissible, &["a"], &[], Weight::Finite(80.))
        );
    }

    #[test]
    fn test_threat_on_discarded_attack_is_charged_once() {
        // c_a is derived from b (80) and from d (90)
        let l = Language::new_with_labels(&["a", "b", "d", "c_a"]);
        let mut framework = WabaFramework::new_with_language(l);
        for a in ["a", "b", "d"] {
            framework.new_assumption(&a).unwrap();
        }
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.new_rule(&"c_a", &[&"d"]).unwrap();
        framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
        framework.set_weight(&"d", Weight::Finite(90.)).unwrap();
        let semiring = GodelSemiring;
        let monoid = SumMonoid;
        let support_computer = SupportComputer::new(&framework, &semiring);
        let resolver = AttackResolver::new(
            &semiring,
            &monoid,
            Weight::Finite(1000.),
            BudgetDirection::UpperBound,
        );
        let evaluator = SemanticsEvaluator::new(&framework, &support_computer, &resolver);
        let in_assumptions = vec![true, true, false, false];
        let supported = support_computer.compute_by_ids(&in_assumptions).unwrap();
        let attacks = potential_attacks(&framework, &supported);
        assert_eq!(1, attacks.len());
        assert_eq!(Weight::Finite(80.), attacks[0].weight);
        let mut resolution = resolver.resolve(4, &attacks, &[true]).unwrap();
        assert_eq!(
            Verdict::Accepted,
            evaluator
                .evaluate(BaseSemantics::Admissible, &in_assumptions, &mut resolution)
                .unwrap()
        );
        assert_eq!(1, resolution.discarded.len());
        assert_eq!(Weight::Finite(90.), resolution.discarded[0].weight);
        assert_eq!(Cost::Scalar(Weight::Finite(90.)), resolution.cost);
    }
}
