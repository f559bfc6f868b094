use super::language::{Atom, Language};
use crate::algebra::Weight;
use crate::utils::LabelType;
use anyhow::{anyhow, Context, Result};

#[derive(Clone, Debug, PartialEq)]
enum AtomType {
    NotAssumption,
    Assumption { contrary_index: Option<usize> },
}

/// A rule in a WABA framework.
///
/// Rules are identified by their index in the framework, in the order they were added.
pub struct Rule<'a, T>
where
    T: LabelType,
{
    id: usize,
    rule_ids: &'a (usize, Vec<usize>),
    language: &'a Language<T>,
}

impl<'a, T> Rule<'a, T>
where
    T: LabelType,
{
    /// Returns the identifier of the rule.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the head of the rule.
    pub fn head(&self) -> &Atom<T> {
        self.language.get_atom_by_id(self.rule_ids.0)
    }

    /// Returns the body of the rule.
    pub fn iter_body(&self) -> impl Iterator<Item = &Atom<T>> + '_ {
        self.rule_ids
            .1
            .iter()
            .map(|i| self.language.get_atom_by_id(*i))
    }

    /// Returns `true` iff the body of the rule is empty.
    pub fn is_fact(&self) -> bool {
        self.rule_ids.1.is_empty()
    }
}

/// Handles a flat weighted ABA framework.
///
/// [WabaFramework] objects hold a language and, built on top of it, the assumptions, their contraries, the rules and the explicit weights.
/// Such kind of framework is initialized with its language. The other components are defined after with dedicated methods
/// ensuring the constraints on them (no assumption on rule heads, at most one contrary for each assumption, at most one weight per atom, ...).
///
/// Atoms that do not receive an explicit weight get the default weight of the semiring used at solving time.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::Weight;
/// # use wabasolver::waba::{Language, WabaFramework};
/// let language = Language::new_with_labels(&["a", "b", "c_a"]);
/// let mut framework = WabaFramework::new_with_language(language);
/// framework.new_assumption(&"a").unwrap();
/// framework.new_assumption(&"b").unwrap();
/// framework.set_contrary(&"a", &"c_a").unwrap();
/// framework.new_rule(&"c_a", &[&"b"]).unwrap();
/// framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
/// assert_eq!(2, framework.n_assumptions());
/// assert_eq!(1, framework.n_rules());
/// ```
#[derive(Clone, Debug)]
pub struct WabaFramework<T>
where
    T: LabelType,
{
    language: Language<T>,
    is_head_of_rule: Vec<bool>,
    atom_type: Vec<AtomType>,
    assumption_indices: Vec<usize>,
    rules: Vec<(usize, Vec<usize>)>,
    rules_by_head: Vec<Vec<usize>>,
    weights: Vec<Option<Weight>>,
}

impl<T> WabaFramework<T>
where
    T: LabelType,
{
    /// Builds a WABA framework given its associated language.
    ///
    /// The framework has no assumption, no rule and no explicit weight.
    pub fn new_with_language(language: Language<T>) -> Self {
        let language_len = language.len();
        WabaFramework {
            language,
            is_head_of_rule: vec![false; language_len],
            atom_type: vec![AtomType::NotAssumption; language_len],
            assumption_indices: Vec::new(),
            rules: Vec::new(),
            rules_by_head: vec![vec![]; language_len],
            weights: vec![None; language_len],
        }
    }

    /// Adds a rule to the framework and returns its identifier.
    ///
    /// The atoms in the head and the body are given by their labels.
    /// If an atom is not part of the language of the framework, an error is returned.
    /// Atoms repeated in the body are considered once.
    ///
    /// Since WABA frameworks under consideration are flat, an error is also returned if the head of the rule has been set as an assumption.
    pub fn new_rule(&mut self, head: &T, body: &[&T]) -> Result<usize> {
        let mut body_vec = Vec::with_capacity(body.len());
        let context = || {
            format!(
                "cannot add a rule with {:?} as head and {:?} as body",
                head, body
            )
        };
        for b in body {
            let id = self.language.get_atom(b).with_context(context)?.id();
            if !body_vec.contains(&id) {
                body_vec.push(id);
            }
        }
        let head_atom_index = self.language.get_atom(head).with_context(context)?.id();
        if matches!(self.atom_type[head_atom_index], AtomType::Assumption { .. }) {
            return Err(anyhow!(
                "cannot set an assumption ({:?}) as the head of a rule in a flat WABA framework",
                head
            ));
        }
        let rule_id = self.rules.len();
        self.rules.push((head_atom_index, body_vec));
        self.rules_by_head[head_atom_index].push(rule_id);
        self.is_head_of_rule[head_atom_index] = true;
        Ok(rule_id)
    }

    /// Sets a language atom as an assumption.
    ///
    /// The atom must exist, must not be already set as an assumption and must not be the head of a rule.
    /// If one of these conditions is not met, an error is returned.
    pub fn new_assumption(&mut self, assumption: &T) -> Result<()> {
        let context = || format!("cannot set {:?} as an assumption", assumption);
        let assumption_index = self
            .language
            .get_atom(assumption)
            .with_context(context)?
            .id();
        if self.is_head_of_rule[assumption_index] {
            return Err(anyhow!(
                "cannot set an assumption ({:?}) which is already the head of a rule in a flat WABA framework",
                assumption
            ));
        }
        if matches!(
            self.atom_type[assumption_index],
            AtomType::Assumption { .. }
        ) {
            return Err(anyhow!(
                "atom already registered as an assumption: {}",
                assumption
            ));
        }
        self.atom_type[assumption_index] = AtomType::Assumption {
            contrary_index: None,
        };
        self.assumption_indices.push(assumption_index);
        Ok(())
    }

    /// Sets the contrary of an assumption.
    ///
    /// The contrary atom does not need to be an assumption, but it must differ from the assumption itself.
    /// An error is returned if the first atom is not an assumption or if it already has a contrary.
    pub fn set_contrary(&mut self, assumption: &T, contrary: &T) -> Result<()> {
        let context = || {
            format!(
                "cannot set {:?} as the contrary of {:?}",
                contrary, assumption
            )
        };
        let assumption_index = self
            .language
            .get_atom(assumption)
            .with_context(context)?
            .id();
        let contrary_index = self.language.get_atom(contrary).with_context(context)?.id();
        if assumption_index == contrary_index {
            return Err(anyhow!("an assumption cannot be its own contrary"))
                .with_context(context);
        }
        match self.atom_type[assumption_index] {
            AtomType::NotAssumption => {
                Err(anyhow!("atom {:?} is not an assumption", assumption)).with_context(context)
            }
            AtomType::Assumption {
                contrary_index: Some(_),
            } => Err(anyhow!("assumption {:?} already has a contrary", assumption))
                .with_context(context),
            AtomType::Assumption {
                contrary_index: None,
            } => {
                self.atom_type[assumption_index] = AtomType::Assumption {
                    contrary_index: Some(contrary_index),
                };
                Ok(())
            }
        }
    }

    /// Sets the explicit weight of an atom.
    ///
    /// An error is returned if the atom already has an explicit weight or if the weight is NaN.
    pub fn set_weight(&mut self, atom: &T, weight: Weight) -> Result<()> {
        let context = || format!("cannot set the weight of {:?} to {}", atom, weight);
        let index = self.language.get_atom(atom).with_context(context)?.id();
        let weight = match weight {
            Weight::Finite(v) => Weight::finite(v).with_context(context)?,
            w => w,
        };
        if let Some(w) = self.weights[index] {
            return Err(anyhow!("atom {:?} already has weight {}", atom, w)).with_context(context);
        }
        self.weights[index] = Some(weight);
        Ok(())
    }

    /// Returns the number of assumptions defined so far.
    pub fn n_assumptions(&self) -> usize {
        self.assumption_indices.len()
    }

    /// Returns `true` iff the provided atom (given by its label) corresponds to an assumption.
    ///
    /// An error is returned if the provided label does not refer to a valid language element.
    pub fn is_assumption(&self, s: &T) -> Result<bool> {
        let index = self
            .language
            .get_atom(s)
            .context("cannot check if the atom is an assumption")?
            .id();
        Ok(self.is_assumption_id(index))
    }

    /// Return an iterator to the assumptions of the language, in the order they were declared.
    ///
    /// # Example
    ///
    /// ```
    /// # use wabasolver::waba::WabaFramework;
    /// # use wabasolver::utils::LabelType;
    /// fn debug_assumptions<T: LabelType>(f: &WabaFramework<T>) {
    ///     for a in f.iter_assumptions() {
    ///         match f.get_contrary(a.label()).unwrap() {
    ///             Some(c) => println!("assumption {} admits {} as contrary", a, c),
    ///             None => println!("assumption {} has no contrary", a),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn iter_assumptions(&self) -> impl Iterator<Item = &Atom<T>> + '_ {
        self.assumption_indices
            .iter()
            .map(move |i| self.language.get_atom_by_id(*i))
    }

    /// Returns the contrary of an assumption given by its label, if it has one.
    ///
    /// If the provided label does not refer to an assumption, an error is returned.
    pub fn get_contrary(&self, s: &T) -> Result<Option<&Atom<T>>> {
        let index = self
            .language
            .get_atom(s)
            .context("cannot get the contrary of the assumption")?
            .id();
        match self.atom_type[index] {
            AtomType::NotAssumption => Err(anyhow!("atom {:?} is not an assumption", s)),
            AtomType::Assumption { contrary_index } => {
                Ok(contrary_index.map(|i| self.language.get_atom_by_id(i)))
            }
        }
    }

    /// Returns the explicit weight of an atom given by its label, if it has one.
    pub fn get_weight(&self, s: &T) -> Result<Option<Weight>> {
        let index = self
            .language
            .get_atom(s)
            .context("cannot get the weight of the atom")?
            .id();
        Ok(self.weights[index])
    }

    /// Returns the number of atoms with an explicit weight.
    pub fn n_weights(&self) -> usize {
        self.weights.iter().filter(|w| w.is_some()).count()
    }

    /// Returns the number of assumptions having a contrary.
    pub fn n_contraries(&self) -> usize {
        self.assumption_indices
            .iter()
            .filter(|a| self.contrary_id(**a).is_some())
            .count()
    }

    /// Returns the underlying language.
    pub fn language(&self) -> &Language<T> {
        &self.language
    }

    /// Returns the number of rules of the framework.
    pub fn n_rules(&self) -> usize {
        self.rules.len()
    }

    /// Provides an iterator to the rules.
    ///
    /// # Example
    ///
    /// ```
    /// # use wabasolver::waba::{Atom, WabaFramework};
    /// # use wabasolver::utils::LabelType;
    /// fn debug_rules<T: LabelType>(f: &WabaFramework<T>) {
    ///     for r in f.iter_rules() {
    ///         println!(
    ///             "rule {}: head={}, body={:?}",
    ///             r.id(),
    ///             r.head(),
    ///             r.iter_body().collect::<Vec<&Atom<T>>>(),
    ///         );
    ///     }
    /// }
    /// ```
    pub fn iter_rules(&self) -> impl Iterator<Item = Rule<T>> + '_ {
        (0..self.rules.len()).map(|i| Rule {
            id: i,
            rule_ids: &self.rules[i],
            language: &self.language,
        })
    }

    pub(crate) fn get_atom_by_id(&self, id: usize) -> &Atom<T> {
        self.language.get_atom_by_id(id)
    }

    pub(crate) fn assumption_ids(&self) -> &[usize] {
        &self.assumption_indices
    }

    pub(crate) fn is_assumption_id(&self, id: usize) -> bool {
        matches!(self.atom_type[id], AtomType::Assumption { .. })
    }

    pub(crate) fn contrary_id(&self, assumption_id: usize) -> Option<usize> {
        match self.atom_type[assumption_id] {
            AtomType::NotAssumption => None,
            AtomType::Assumption { contrary_index } => contrary_index,
        }
    }

    pub(crate) fn rule_ids_by_head(&self, head_id: usize) -> &[usize] {
        &self.rules_by_head[head_id]
    }

    pub(crate) fn rule_body_ids(&self, rule_id: usize) -> &[usize] {
        &self.rules[rule_id].1
    }

    pub(crate) fn weight_by_id(&self, atom_id: usize) -> Option<Weight> {
        self.weights[atom_id]
    }

    pub(crate) fn explicit_weights(&self) -> impl Iterator<Item = Weight> + '_ {
        self.weights.iter().filter_map(|w| *w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_two() -> WabaFramework<&'static str> {
        let l = Language::new_with_labels(&["a", "b", "c_a"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"b").unwrap();
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
        framework
    }

    #[test]
    fn test_new_rule() {
        let l = Language::new_with_labels(&["a", "b", "c"]);
        let mut framework = WabaFramework::new_with_language(l);
        assert_eq!(0, framework.new_rule(&"a", &[&"b", &"c", &"b"]).unwrap());
        assert_eq!(1, framework.new_rule(&"a", &[]).unwrap());
        assert_eq!(2, framework.n_rules());
        assert_eq!(&[1, 2], framework.rule_body_ids(0));
        assert_eq!(&[0, 1], framework.rule_ids_by_head(0));
        let rules = framework.iter_rules().collect::<Vec<_>>();
        assert!(!rules[0].is_fact());
        assert!(rules[1].is_fact());
        assert_eq!(&"a", rules[1].head().label());
    }

    #[test]
    fn test_new_rule_unknown_atom() {
        let l = Language::new_with_labels(&["a", "b"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_rule(&"d", &[&"b"]).unwrap_err();
        framework.new_rule(&"a", &[&"d"]).unwrap_err();
    }

    #[test]
    fn test_assumption_as_head() {
        let l = Language::new_with_labels(&["a", "b"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_rule(&"a", &[&"b"]).unwrap_err();
        let mut framework = WabaFramework::new_with_language(Language::new_with_labels(&["a"]));
        framework.new_rule(&"a", &[]).unwrap();
        framework.new_assumption(&"a").unwrap_err();
    }

    #[test]
    fn test_assumption_already_registered() {
        let l = Language::new_with_labels(&["a"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"a").unwrap_err();
    }

    #[test]
    fn test_contraries() {
        let framework = scenario_two();
        assert_eq!(
            &"c_a",
            framework.get_contrary(&"a").unwrap().unwrap().label()
        );
        assert!(framework.get_contrary(&"b").unwrap().is_none());
        framework.get_contrary(&"c_a").unwrap_err();
        assert_eq!(1, framework.n_contraries());
    }

    #[test]
    fn test_contrary_errors() {
        let mut framework = scenario_two();
        framework.set_contrary(&"a", &"b").unwrap_err();
        framework.set_contrary(&"c_a", &"a").unwrap_err();
        framework.set_contrary(&"b", &"b").unwrap_err();
        framework.set_contrary(&"b", &"x").unwrap_err();
    }

    #[test]
    fn test_weights() {
        let mut framework = scenario_two();
        assert_eq!(
            Some(Weight::Finite(80.)),
            framework.get_weight(&"b").unwrap()
        );
        assert_eq!(None, framework.get_weight(&"a").unwrap());
        framework.set_weight(&"b", Weight::zero()).unwrap_err();
        framework.set_weight(&"c_a", Weight::PosInf).unwrap();
        assert_eq!(2, framework.n_weights());
    }

    #[test]
    fn test_nan_weight() {
        let mut framework = scenario_two();
        framework
            .set_weight(&"a", Weight::Finite(f64::NAN))
            .unwrap_err();
        assert_eq!(None, framework.get_weight(&"a").unwrap());
        framework
            .set_weight(&"a", Weight::Finite(f64::INFINITY))
            .unwrap();
        assert_eq!(Some(Weight::PosInf), framework.get_weight(&"a").unwrap());
    }

    #[test]
    fn test_is_assumption() {
        let framework = scenario_two();
        assert!(framework.is_assumption(&"a").unwrap());
        assert!(!framework.is_assumption(&"c_a").unwrap());
        framework.is_assumption(&"x").unwrap_err();
        assert_eq!(
            vec!["a", "b"],
            framework
                .iter_assumptions()
                .map(|a| *a.label())
                .collect::<Vec<_>>()
        );
    }
}
