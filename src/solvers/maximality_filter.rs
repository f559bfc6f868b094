/// Returns `true` iff the first set is a subset of the second, both given by flags.
pub(crate) fn is_subset(s1: &[bool], s2: &[bool]) -> bool {
    s1.iter().zip(s2.iter()).all(|(a, b)| !*a || *b)
}

/// Keeps the elements whose key set is maximal w.r.t. set inclusion among the keys of all the elements.
///
/// Elements sharing the same maximal key are all kept.
pub(crate) fn keep_maximal<C, F>(candidates: Vec<C>, key: F) -> Vec<C>
where
    F: Fn(&C) -> Vec<bool>,
{
    let keys = candidates.iter().map(&key).collect::<Vec<Vec<bool>>>();
    let mut distinct_keys = keys.clone();
    distinct_keys.sort_unstable();
    distinct_keys.dedup();
    candidates
        .into_iter()
        .zip(keys.iter())
        .filter(|(_, k)| {
            !distinct_keys
                .iter()
                .any(|other| other != *k && is_subset(k, other))
        })
        .map(|(c, _)| c)
        .collect()
}

/// Keeps the elements whose key set is minimal w.r.t. set inclusion among the keys of all the elements.
///
/// Elements sharing the same minimal key are all kept.
pub(crate) fn keep_minimal<C, F>(candidates: Vec<C>, key: F) -> Vec<C>
where
    F: Fn(&C) -> Vec<bool>,
{
    let keys = candidates.iter().map(&key).collect::<Vec<Vec<bool>>>();
    let mut distinct_keys = keys.clone();
    distinct_keys.sort_unstable();
    distinct_keys.dedup();
    candidates
        .into_iter()
        .zip(keys.iter())
        .filter(|(_, k)| {
            !distinct_keys
                .iter()
                .any(|other| other != *k && is_subset(other, k))
        })
        .map(|(c, _)| c)
        .collect()
}

/// Computes the intersection of the provided sets, or `None` if no set is provided.
pub(crate) fn intersection<'a, I>(sets: I) -> Option<Vec<bool>>
where
    I: IntoIterator<Item = &'a Vec<bool>>,
{
    sets.into_iter().fold(None, |acc, s| match acc {
        None => Some(s.clone()),
        Some(mut i) => {
            i.iter_mut().zip(s.iter()).for_each(|(a, b)| *a = *a && *b);
            Some(i)
        }
    })
}
