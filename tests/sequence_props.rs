use battleship_adt::Sequence;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    PushBack(u16),
    PushFront(u16),
    PopBack,
    PopFront,
    /// Seek to index `n % len` from the head and pop there.
    PopAt(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u16>().prop_map(Op::PushBack),
        any::<u16>().prop_map(Op::PushFront),
        Just(Op::PopBack),
        Just(Op::PopFront),
        any::<usize>().prop_map(Op::PopAt),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Alternating push_back / pop_front keeps len equal to the net count.
    #[test]
    fn push_pop_len_tracks_net_count(ops in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut seq = Sequence::new();
        let mut expected = 0usize;
        for (i, push) in ops.into_iter().enumerate() {
            if push {
                seq.push_back(i);
                expected += 1;
            } else if seq.pop_front().is_some() {
                expected -= 1;
            }
            prop_assert_eq!(seq.len(), expected);
        }
    }

    /// The sequence behaves like a VecDeque under any mix of operations.
    #[test]
    fn matches_vecdeque_model(ops in prop::collection::vec(op_strategy(), 0..150)) {
        let mut seq = Sequence::new();
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Op::PushBack(v) => {
                    seq.push_back(v);
                    model.push_back(v);
                }
                Op::PushFront(v) => {
                    seq.push_front(v);
                    model.push_front(v);
                }
                Op::PopBack => prop_assert_eq!(seq.pop_back(), model.pop_back()),
                Op::PopFront => prop_assert_eq!(seq.pop_front(), model.pop_front()),
                Op::PopAt(n) => {
                    if model.is_empty() {
                        prop_assert_eq!(seq.cursor_front_mut().pop_current(), None);
                        continue;
                    }
                    let idx = n % model.len();
                    let mut cursor = seq.cursor_front_mut();
                    for _ in 0..idx {
                        cursor.move_next();
                    }
                    let popped = cursor.pop_current();
                    prop_assert_eq!(popped, model.remove(idx));
                    prop_assert_eq!(cursor.current().copied(), model.get(idx).copied());
                }
            }
            prop_assert_eq!(seq.len(), model.len());
            prop_assert_eq!(seq.front(), model.front());
            prop_assert_eq!(seq.back(), model.back());
        }
        let forward: Vec<_> = seq.iter().copied().collect();
        let backward: Vec<_> = seq.iter().rev().copied().collect();
        let model_fwd: Vec<_> = model.iter().copied().collect();
        let model_bwd: Vec<_> = model.iter().rev().copied().collect();
        prop_assert_eq!(forward, model_fwd);
        prop_assert_eq!(backward, model_bwd);
    }
}
