use std::hash::Hash;

use indexmap::IndexMap;

/// Fold `items` into one accumulator per key. Keys keep first-seen order so
/// downstream tie-breaks follow input row order.
pub fn group_reduce<T, K, A, FK, FI, FF>(
    items: impl IntoIterator<Item = T>,
    mut key: FK,
    mut init: FI,
    mut fold: FF,
) -> IndexMap<K, A>
where
    K: Eq + Hash,
    FK: FnMut(&T) -> K,
    FI: FnMut() -> A,
    FF: FnMut(&mut A, T),
{
    let mut groups = IndexMap::new();
    for item in items {
        let acc = groups.entry(key(&item)).or_insert_with(&mut init);
        fold(acc, item);
    }
    groups
}

/// Sum an integer measure per key.
pub fn group_sum<T, K, FK, FV>(
    items: impl IntoIterator<Item = T>,
    key: FK,
    mut value: FV,
) -> IndexMap<K, i64>
where
    K: Eq + Hash,
    FK: FnMut(&T) -> K,
    FV: FnMut(&T) -> i64,
{
    group_reduce(items, key, || 0_i64, |acc, item| *acc += value(&item))
}

/// Two-level sum, e.g. style -> size -> units.
pub fn group_sum_nested<T, K1, K2, F1, F2, FV>(
    items: impl IntoIterator<Item = T>,
    mut outer: F1,
    mut inner: F2,
    mut value: FV,
) -> IndexMap<K1, IndexMap<K2, i64>>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    F1: FnMut(&T) -> K1,
    F2: FnMut(&T) -> K2,
    FV: FnMut(&T) -> i64,
{
    group_reduce(
        items,
        |item| outer(item),
        IndexMap::new,
        |acc: &mut IndexMap<K2, i64>, item| {
            *acc.entry(inner(&item)).or_insert(0) += value(&item);
        },
    )
}
