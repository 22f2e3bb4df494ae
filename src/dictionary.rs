//! Hash map with separate chaining.
//!
//! Every bucket slot is either empty or a non-empty [`Sequence`] of
//! [`Pair`]s; a bucket whose last pair is removed is released. The table
//! doubles and rehashes when the load factor measured *before* an insertion
//! exceeds 3/4, so growth lags the nominal threshold by one insertion: at
//! 100 buckets the 77th distinct key triggers the resize to 200.
//!
//! Hash and equality are plain function pointers chosen at construction;
//! see [`crate::hash`] for the stock ones.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

use crate::common::CollectionError;
use crate::config::{INITIAL_CAPACITY, LOAD_FACTOR_DEN, LOAD_FACTOR_NUM};
use crate::hash::{EqualFn, HashFn};
use crate::sequence::{self, Sequence};

/// Key/value record stored in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

type Bucket<K, V> = Option<Sequence<Pair<K, V>>>;

fn alloc_buckets<K, V>(capacity: usize) -> Result<Vec<Bucket<K, V>>, CollectionError> {
    if capacity == 0 {
        return Err(CollectionError::ZeroCapacity);
    }
    let mut buckets = Vec::new();
    if buckets.try_reserve_exact(capacity).is_err() {
        log::error!("dictionary: unable to allocate {} buckets", capacity);
        return Err(CollectionError::AllocationFailed {
            requested: capacity,
        });
    }
    buckets.resize_with(capacity, || None);
    Ok(buckets)
}

/// Separately chained hash map.
#[derive(Clone)]
pub struct Dictionary<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    hash: HashFn<K>,
    equal: EqualFn<K>,
}

impl<K, V> Dictionary<K, V> {
    /// Create an empty dictionary with [`INITIAL_CAPACITY`] buckets.
    pub fn new(hash: HashFn<K>, equal: EqualFn<K>) -> Self {
        let mut buckets = Vec::with_capacity(INITIAL_CAPACITY);
        buckets.resize_with(INITIAL_CAPACITY, || None);
        Self {
            buckets,
            len: 0,
            hash,
            equal,
        }
    }

    /// Create an empty dictionary with `capacity` buckets.
    pub fn with_capacity(
        capacity: usize,
        hash: HashFn<K>,
        equal: EqualFn<K>,
    ) -> Result<Self, CollectionError> {
        Ok(Self {
            buckets: alloc_buckets(capacity)?,
            len: 0,
            hash,
            equal,
        })
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bucket slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of bucket slots holding at least one pair.
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| b.is_some()).count()
    }

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        self.index_in(key, self.buckets.len())
    }

    #[inline]
    fn index_in(&self, key: &K, capacity: usize) -> usize {
        let index = (self.hash)(key, capacity);
        debug_assert!(
            index < capacity,
            "hash returned {} for capacity {}",
            index,
            capacity
        );
        index % capacity
    }

    fn over_threshold(&self) -> bool {
        self.len.saturating_mul(LOAD_FACTOR_DEN)
            > self.buckets.len().saturating_mul(LOAD_FACTOR_NUM)
    }

    /// Insert `value` under `key`.
    ///
    /// If an equal key is already present its value is replaced and the old
    /// one returned; the stored key is kept and `key` is dropped. Fails only
    /// when growing the table or the bucket cannot be allocated, in which
    /// case the dictionary is left as it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CollectionError> {
        if self.over_threshold() {
            self.grow()?;
        }
        let index = self.bucket_index(&key);
        let equal = self.equal;
        let bucket = &mut self.buckets[index];

        if let Some(pair) = bucket
            .as_mut()
            .and_then(|seq| seq.find_mut(|p| equal(&p.key, &key)))
        {
            return Ok(Some(mem::replace(&mut pair.value, value)));
        }

        let seq = bucket.get_or_insert_with(Sequence::new);
        if let Err(err) = seq.try_push_back(Pair { key, value }) {
            if seq.is_empty() {
                *bucket = None;
            }
            return Err(err);
        }
        self.len += 1;
        Ok(None)
    }

    fn grow(&mut self) -> Result<(), CollectionError> {
        let Some(new_capacity) = self.buckets.len().checked_mul(2) else {
            log::error!("dictionary: capacity overflow at {} buckets", self.buckets.len());
            return Err(CollectionError::CapacityOverflow);
        };
        self.rehash(new_capacity)
    }

    /// Move every pair into a fresh table of `new_capacity` buckets,
    /// bucket by bucket and in chain order.
    ///
    /// All allocation happens before the first pair moves: the new chains
    /// are created at their final length, so an error leaves the table as
    /// it was.
    fn rehash(&mut self, new_capacity: usize) -> Result<(), CollectionError> {
        let mut buckets = alloc_buckets(new_capacity)?;
        let mut counts = Vec::new();
        if counts.try_reserve_exact(new_capacity).is_err() {
            log::error!("dictionary: unable to size {} buckets", new_capacity);
            return Err(CollectionError::AllocationFailed {
                requested: new_capacity,
            });
        }
        counts.resize(new_capacity, 0usize);
        for (key, _) in self.iter() {
            counts[self.index_in(key, new_capacity)] += 1;
        }
        for (bucket, &count) in buckets.iter_mut().zip(&counts) {
            if count > 0 {
                *bucket = Some(Sequence::try_with_capacity(count)?);
            }
        }

        let old = mem::replace(&mut self.buckets, buckets);
        log::debug!(
            "dictionary: rehash {} -> {} buckets ({} pairs)",
            old.len(),
            new_capacity,
            self.len
        );
        for pair in old.into_iter().flatten().flatten() {
            let index = self.bucket_index(&pair.key);
            self.buckets[index]
                .get_or_insert_with(Sequence::new)
                .push_back(pair);
        }
        Ok(())
    }

    fn find(&self, key: &K) -> Option<&Pair<K, V>> {
        if self.len == 0 {
            return None;
        }
        let equal = self.equal;
        self.buckets
            .get(self.bucket_index(key))?
            .as_ref()?
            .iter()
            .find(|p| equal(&p.key, key))
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|p| &p.value)
    }

    /// Stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|p| (&p.key, &p.value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.len == 0 {
            return None;
        }
        let index = self.bucket_index(key);
        let equal = self.equal;
        self.buckets
            .get_mut(index)?
            .as_mut()?
            .find_mut(|p| equal(&p.key, key))
            .map(|p| &mut p.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove `key`, returning the stored key and value. Releases the
    /// bucket when it becomes empty.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }
        let index = self.bucket_index(key);
        let equal = self.equal;
        let bucket = self.buckets.get_mut(index)?;
        let seq = bucket.as_mut()?;

        let mut cursor = seq.cursor_front_mut();
        let pair = loop {
            let hit = match cursor.current() {
                Some(pair) => equal(&pair.key, key),
                None => return None,
            };
            if hit {
                break cursor.pop_current()?;
            }
            cursor.move_next();
        };

        if seq.is_empty() {
            *bucket = None;
        }
        self.len -= 1;
        Some(pair.into_parts())
    }

    /// Drop every pair and bucket chain, keeping the bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = None;
        }
        self.len = 0;
    }

    /// Iterate pairs by ascending bucket index, then insertion order within
    /// a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            pairs: None,
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over the pairs of a [`Dictionary`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    pairs: Option<sequence::Iter<'a, Pair<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.pairs.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&pair.key, &pair.value));
            }
            if let Some(seq) = self.buckets.next()? {
                self.pairs = Some(seq.iter());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
