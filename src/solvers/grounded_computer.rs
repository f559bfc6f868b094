use crate::waba::attack_resolver::potential_attacks;
use crate::waba::{SupportComputer, UnstableFixpoint, WabaFramework};
use crate::utils::LabelType;

/// Computes the in assumptions of the grounded extension, flagged by atom ids.
///
/// The extension is the least fixpoint of the function returning the assumptions defended by a set of assumptions,
/// computed from the empty set; no attack is discarded.
/// An assumption is defended iff its contrary is not supported by the assumptions left undefeated by the current set.
pub(crate) fn grounded_assumptions<T>(
    framework: &WabaFramework<T>,
    support_computer: &SupportComputer<T>,
) -> Result<Vec<bool>, UnstableFixpoint>
where
    T: LabelType,
{
    let n_atoms = framework.language().len();
    let mut current = vec![false; n_atoms];
    loop {
        let supported = support_computer.compute_by_ids(&current)?;
        let mut undefeated = vec![false; n_atoms];
        for a in framework.assumption_ids() {
            undefeated[*a] = true;
        }
        for attack in potential_attacks(framework, &supported) {
            undefeated[attack.attacked] = false;
        }
        let undefeated_support = support_computer.compute_by_ids(&undefeated)?;
        let mut next = vec![false; n_atoms];
        for a in framework.assumption_ids() {
            next[*a] = framework
                .contrary_id(*a)
                .map(|c| undefeated_support[c].is_none())
                .unwrap_or(true);
        }
        if next == current {
            return Ok(current);
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::GodelSemiring;
    use crate::waba::Language;

    fn labels(framework: &WabaFramework<&'static str>, flags: &[bool]) -> Vec<&'static str> {
        flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| *framework.language().get_atom_by_id(i).label())
            .collect()
    }

    #[test]
    fn test_chain() {
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
        let semiring = GodelSemiring;
        let computer = SupportComputer::new(&framework, &semiring);
        let grounded = grounded_assumptions(&framework, &computer).unwrap();
        assert_eq!(vec!["a", "c"], labels(&framework, &grounded));
    }

    #[test]
    fn test_mutual_attack() {
        let l = Language::new_with_labels(&["a", "b", "c_a", "c_b"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"b").unwrap();
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.set_contrary(&"b", &"c_b").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.new_rule(&"c_b", &[&"a"]).unwrap();
        let semiring = GodelSemiring;
        let computer = SupportComputer::new(&framework, &semiring);
        let grounded = grounded_assumptions(&framework, &computer).unwrap();
        assert!(labels(&framework, &grounded).is_empty());
    }

    #[test]
    fn test_fact_attack() {
        let l = Language::new_with_labels(&["a", "b", "c_a"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"b").unwrap();
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.new_rule(&"c_a", &[]).unwrap();
        let semiring = GodelSemiring;
        let computer = SupportComputer::new(&framework, &semiring);
        let grounded = grounded_assumptions(&framework, &computer).unwrap();
        assert_eq!(vec!["b"], labels(&framework, &grounded));
    }
}
