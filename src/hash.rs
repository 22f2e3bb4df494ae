//! Ready-made hash and equality functions for [`Dictionary`](crate::Dictionary).
//!
//! A hash function maps a key and the current bucket count to an index
//! strictly below that count. `int_hash` only accepts primitive integers and
//! `string_hash` only byte-viewable keys, so a mismatched pairing is a type
//! error.

use core::ops::Deref;
use num_traits::{PrimInt, ToPrimitive};

/// Bucket index function: `hash(key, capacity) < capacity`.
pub type HashFn<K> = fn(&K, usize) -> usize;

/// Key equality function.
pub type EqualFn<K> = fn(&K, &K) -> bool;

/// Hash for primitive integer keys: the key reduced modulo `capacity`,
/// corrected to be non-negative.
pub fn int_hash<K: PrimInt>(key: &K, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    match key.to_i128() {
        Some(k) => k.rem_euclid(capacity as i128) as usize,
        // only u128 values above i128::MAX end up here
        None => key
            .to_u128()
            .map_or(0, |k| (k % capacity as u128) as usize),
    }
}

/// djb2 string hash (`h = h * 33 + byte`, starting at 5381) over the key's
/// bytes, accumulated unsigned with wrap-around and reduced modulo
/// `capacity`.
pub fn string_hash<K: AsRef<[u8]> + ?Sized>(key: &K, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    let hash = key
        .as_ref()
        .iter()
        .fold(5381u64, |h, &b| h.wrapping_mul(33).wrapping_add(u64::from(b)));
    (hash % capacity as u64) as usize
}

/// Equality through `PartialEq`.
pub fn key_eq<K: PartialEq>(a: &K, b: &K) -> bool {
    a == b
}

/// Identity: both handles point at the same target in memory.
pub fn same_ref<K: Deref>(a: &K, b: &K) -> bool {
    core::ptr::eq(&**a, &**b)
}
