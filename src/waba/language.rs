use crate::utils::LabelType;
use anyhow::{anyhow, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;

/// Handles an atom of the language.
///
/// Each atom has a label and an identifier which are unique in a language.
/// This uniqueness condition imposes atoms are made from [Language] objects, and not directly by the [Atom] struct.
///
/// The type of the labels must be [`LabelType`] instances.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Atom<T>
where
    T: LabelType,
{
    id: usize,
    label: T,
}

impl<T> Atom<T>
where
    T: LabelType,
{
    /// Returns the label of the atom.
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Returns the id of the atom.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T> Display for Atom<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Handles the atoms that may be used in a WABA framework.
///
/// # Example
///
/// ```
/// # use wabasolver::waba::Language;
/// let language = Language::new_with_labels(&["a", "b", "c_a", "c_b"]);
/// for (i,s) in language.iter().enumerate() {
///     assert_eq!(i, language.get_atom(s.label()).unwrap().id());
///     assert_eq!(s, language.get_atom_by_id(i));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Language<T>
where
    T: LabelType,
{
    atoms: Vec<Atom<T>>,
    label_to_id: HashMap<T, usize>,
}

impl<T> Language<T>
where
    T: LabelType,
{
    /// Builds a new language given the labels of the atoms.
    ///
    /// Each atom will be assigned an id equal to its index in the provided slice of atom names.
    /// If a label appears multiple times, the first occurrence is the only one that is considered.
    pub fn new_with_labels(atoms: &[T]) -> Self {
        let mut label_to_id = HashMap::with_capacity(atoms.len());
        let mut language = Vec::with_capacity(atoms.len());
        for s in atoms.iter() {
            match label_to_id.entry(s.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(e) => {
                    e.insert(language.len());
                }
            }
            language.push(Atom {
                id: language.len(),
                label: s.clone(),
            });
        }
        Language {
            atoms: language,
            label_to_id,
        }
    }

    /// Returns the number of atoms in the language.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Returns `true` iff the language has no atom.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the atom associated to a label.
    ///
    /// An error is returned if no atom corresponds to the provided label.
    pub fn get_atom(&self, label: &T) -> Result<&Atom<T>> {
        self.label_to_id
            .get(label)
            .map(|i| &self.atoms[*i])
            .ok_or_else(|| anyhow!("no such atom: {}", label))
    }

    /// Returns the atom with the corresponding identifier.
    ///
    /// # Panics
    ///
    /// Panics if no atom has the corresponding identifier.
    pub fn get_atom_by_id(&self, id: usize) -> &Atom<T> {
        &self.atoms[id]
    }

    /// Provides an iterator to the atoms, in the order of their identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &Atom<T>> {
        self.atoms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let atoms = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let l = Language::new_with_labels(&atoms);
        assert_eq!(3, l.len());
        assert!(!l.is_empty());
        for (i, s) in l.iter().enumerate() {
            assert_eq!(i, s.id());
            assert_eq!(&atoms[i], s.label());
        }
    }

    #[test]
    fn test_new_empty() {
        let l = Language::new_with_labels(&[] as &[String]);
        assert_eq!(0, l.len());
        assert!(l.is_empty());
    }

    #[test]
    fn test_duplicate_atom() {
        let l = Language::new_with_labels(&["a", "b", "a"]);
        assert_eq!(2, l.len());
        assert_eq!(1, l.get_atom(&"b").unwrap().id());
    }

    #[test]
    fn test_unknown_atom() {
        let l = Language::new_with_labels(&["a"]);
        assert_eq!(
            "no such atom: b",
            l.get_atom(&"b").unwrap_err().to_string()
        );
    }

    #[test]
    fn test_display() {
        let l = Language::new_with_labels(&["c_a"]);
        assert_eq!("c_a", l.get_atom_by_id(0).to_string());
    }
}
