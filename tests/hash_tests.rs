use battleship_adt::{int_hash, key_eq, same_ref, string_hash};
use proptest::prelude::*;
use std::rc::Rc;

#[test]
fn test_int_hash_is_non_negative_modulo() {
    assert_eq!(int_hash(&7i32, 100), 7);
    assert_eq!(int_hash(&107i32, 100), 7);
    assert_eq!(int_hash(&-1i32, 100), 99);
    assert_eq!(int_hash(&-100i32, 100), 0);
    assert_eq!(int_hash(&250u8, 100), 50);
    assert_eq!(int_hash(&i64::MIN, 7), (i64::MIN as i128).rem_euclid(7) as usize);
    assert_eq!(int_hash(&u128::MAX, 10), 5);
    assert_eq!(int_hash(&5i32, 0), 0);
}

#[test]
fn test_string_hash_djb2() {
    assert_eq!(string_hash("", 100_000), 5381);
    // 5381 * 33 + 'a'
    assert_eq!(string_hash("a", 1_000_000), 177_670);
    assert_eq!(string_hash("a", 100), 70);
    // 177670 * 33 + 'b'
    assert_eq!(string_hash("ab", 1000), 208);
    assert_eq!(string_hash(&String::from("ab"), 1000), 208);
    assert_eq!(string_hash(b"ab".as_slice(), 1000), 208);
    assert_eq!(string_hash("ab", 0), 0);
}

#[test]
fn test_equality_helpers() {
    assert!(key_eq(&3, &3));
    assert!(!key_eq(&"a", &"b"));

    let a = Rc::new(String::from("ship"));
    let b = Rc::new(String::from("ship"));
    assert!(same_ref(&a, &Rc::clone(&a)));
    assert!(!same_ref(&a, &b));
    assert!(key_eq(&a, &b));
}

proptest! {
    #[test]
    fn hashes_stay_below_capacity(k in any::<i64>(), s in ".*", cap in 1usize..10_000) {
        prop_assert!(int_hash(&k, cap) < cap);
        prop_assert!(string_hash(&s, cap) < cap);
    }

    #[test]
    fn int_hash_is_congruent(k in any::<i32>(), cap in 1usize..1000) {
        let h = int_hash(&k, cap) as i64;
        prop_assert_eq!((k as i64 - h).rem_euclid(cap as i64), 0);
    }
}
