// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection joins across datasets that share a key dimension.

use alloc::borrow::ToOwned;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::{Equivalent, HashSet};

/// Restricts every dataset to the rows whose key is present in all datasets.
///
/// The output has the same length and order as `datasets`, and rows keep their relative
/// order. If any dataset is empty (or no dataset is given) every output is empty. This is
/// [`JoinKeys`] applied to datasets of one row type.
pub fn join<T, K>(datasets: &[&[T]], key: impl Fn(&T) -> &K) -> Vec<Vec<T>>
where
    T: Clone,
    K: Clone + Eq + Hash,
{
    let keys = datasets
        .iter()
        .fold(JoinKeys::<K>::new(), |keys, rows| keys.with(rows, &key));
    datasets.iter().map(|rows| keys.retain(rows, &key)).collect()
}

/// The set of keys present in every dataset added so far.
///
/// This is the heterogeneous form of [`join`]: each dataset may have its own row type as long
/// as they agree on the key type.
///
/// ```
/// use insight_transforms::JoinKeys;
///
/// let viewership = [("Dota 2", 2019), ("Fortnite", 2019)];
/// let general = [("Dota 2", "MOBA"), ("Smite", "MOBA")];
///
/// let keys = JoinKeys::new()
///     .with(&viewership, |r| r.0)
///     .with(&general, |r| r.0);
/// assert_eq!(keys.retain(&viewership, |r| r.0), [("Dota 2", 2019)]);
/// ```
#[derive(Clone, Debug)]
pub struct JoinKeys<K> {
    keys: Option<HashSet<K>>,
}

impl<K> Default for JoinKeys<K> {
    fn default() -> Self {
        Self { keys: None }
    }
}

impl<K: Eq + Hash> JoinKeys<K> {
    /// Creates an empty join. Until a dataset is added, no key is common.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersects the common keys with the keys of `rows`.
    pub fn with<T, Q>(mut self, rows: &[T], key: impl Fn(&T) -> &Q) -> Self
    where
        Q: ?Sized + Hash + Equivalent<K> + ToOwned<Owned = K>,
    {
        let next: HashSet<K> = match &self.keys {
            None => rows.iter().map(|row| key(row).to_owned()).collect(),
            Some(prev) => rows
                .iter()
                .map(&key)
                .filter(|q| prev.contains(*q))
                .map(ToOwned::to_owned)
                .collect(),
        };
        self.keys = Some(next);
        self
    }

    /// Returns `true` if `key` is present in every dataset added so far.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.keys.as_ref().is_some_and(|keys| keys.contains(key))
    }

    /// Number of common keys.
    pub fn len(&self) -> usize {
        self.keys.as_ref().map_or(0, HashSet::len)
    }

    /// Returns `true` when no key is common.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the rows of `rows` whose key is common, preserving order.
    pub fn retain<T, Q>(&self, rows: &[T], key: impl Fn(&T) -> &Q) -> Vec<T>
    where
        T: Clone,
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let kept: Vec<T> = rows
            .iter()
            .filter(|row| self.contains(key(row)))
            .cloned()
            .collect();
        log::trace!("join kept {} of {} rows", kept.len(), rows.len());
        kept
    }
}
