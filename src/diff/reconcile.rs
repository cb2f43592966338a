//! Generic keyed reconciliation.
//!
//! The one piece of genuine reuse in the diff core: every entity kind (and
//! every nested table-schema group) is compared with the same "build two
//! maps, diff three ways" walk, parameterized by a key extractor and a
//! field-diff function.

use std::collections::HashMap;
use std::hash::Hash;

use super::schema::{EntityDiff, Reconciliation};

/// Ordered classification of one entity during a reconciliation walk.
///
/// Entries for keys known to the first snapshot come out in first-snapshot
/// insertion order (only-in-first, differing, and matching interleaved as
/// encountered); entries for keys known only to the second snapshot follow,
/// in second-snapshot insertion order. Consumers that need buckets use
/// [`reconcile`]; consumers that need the interleaved order (the nested
/// table-schema groups) walk the stream directly.
#[derive(Debug)]
pub enum Entry<'a, T> {
    OnlyInFirst(&'a T),
    OnlyInSecond(&'a T),
    Differing {
        first: &'a T,
        second: &'a T,
        differences: Vec<String>,
    },
    Matching(&'a T),
}

/// Index a list by key, keeping first-occurrence key order.
///
/// Duplicate keys are last-write-wins on the record (map-construction
/// semantics) while the key keeps its original position. Upstream sources
/// should not produce duplicates; if one does, the later row silently
/// replaces the earlier one.
fn index_by_key<'a, T, K, F>(items: &'a [T], key_of: &F) -> (Vec<K>, HashMap<K, &'a T>)
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut order = Vec::with_capacity(items.len());
    let mut map = HashMap::with_capacity(items.len());

    for item in items {
        let key = key_of(item);
        if map.insert(key.clone(), item).is_none() {
            order.push(key);
        }
    }

    (order, map)
}

/// Walk two keyed lists and classify every entity, in deterministic order.
///
/// # Arguments
/// * `first` / `second` - the two snapshots of one entity kind
/// * `key_of` - identity key extractor
/// * `diff_of` - field-level difference extractor; an empty result means
///   the entities match
pub fn classify<'a, T, K, FK, FD>(
    first: &'a [T],
    second: &'a [T],
    key_of: FK,
    diff_of: FD,
) -> Vec<Entry<'a, T>>
where
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> K,
    FD: Fn(&T, &T) -> Vec<String>,
{
    let (first_order, first_map) = index_by_key(first, &key_of);
    let (second_order, second_map) = index_by_key(second, &key_of);

    let mut entries = Vec::with_capacity(first_order.len() + second_order.len());

    for key in &first_order {
        let a = first_map[key];
        match second_map.get(key).copied() {
            None => entries.push(Entry::OnlyInFirst(a)),
            Some(b) => {
                let differences = diff_of(a, b);
                if differences.is_empty() {
                    entries.push(Entry::Matching(a));
                } else {
                    entries.push(Entry::Differing {
                        first: a,
                        second: b,
                        differences,
                    });
                }
            }
        }
    }

    for key in &second_order {
        if !first_map.contains_key(key) {
            entries.push(Entry::OnlyInSecond(second_map[key]));
        }
    }

    entries
}

/// Reconcile two keyed lists into the four result buckets.
///
/// Pure and total over any two finite lists, empty lists included. Bucket
/// order follows the classification order of [`classify`], so output is
/// deterministic for a given input order.
pub fn reconcile<T, K, FK, FD>(
    first: &[T],
    second: &[T],
    key_of: FK,
    diff_of: FD,
) -> Reconciliation<T>
where
    T: Clone,
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> K,
    FD: Fn(&T, &T) -> Vec<String>,
{
    let mut result = Reconciliation::empty();

    for entry in classify(first, second, key_of, diff_of) {
        match entry {
            Entry::OnlyInFirst(a) => result.only_in_first.push(a.clone()),
            Entry::OnlyInSecond(b) => result.only_in_second.push(b.clone()),
            Entry::Matching(a) => result.matching.push(a.clone()),
            Entry::Differing {
                first,
                second,
                differences,
            } => result.differing.push(EntityDiff {
                first: first.clone(),
                second: second.clone(),
                differences,
            }),
        }
    }

    result
}
