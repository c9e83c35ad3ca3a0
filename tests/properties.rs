//! Property tests checking `ResizableArray` against `std::vec::Vec` as a model.

use proptest::prelude::*;
use resizable_array::{ArrayError, ResizableArray};

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Remove(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        2 => (0usize..40, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        1 => (0usize..40).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn arb_values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..64)
}

proptest! {
    #[test]
    fn pushes_are_readable_in_order(values in arb_values()) {
        let mut arr = ResizableArray::new();
        for &v in &values {
            arr.push(v);
        }
        prop_assert_eq!(arr.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(arr.at(i), Ok(v));
        }
        prop_assert!(arr.at(values.len()).is_err());
    }

    #[test]
    fn push_then_pop_round_trips(values in arb_values(), extra in any::<i32>()) {
        let mut arr: ResizableArray<i32> = values.iter().copied().collect();
        arr.push(extra);
        prop_assert_eq!(arr.pop(), Ok(extra));
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn insert_shifts_suffix(values in arb_values(), seed in any::<usize>(), v in any::<i32>()) {
        let k = seed % (values.len() + 1);
        let mut arr: ResizableArray<i32> = values.iter().copied().collect();
        arr.insert(k, v).unwrap();
        prop_assert_eq!(arr.len(), values.len() + 1);
        prop_assert_eq!(arr.at(k), Ok(&v));
        for i in 0..k {
            prop_assert_eq!(arr[i], values[i]);
        }
        for i in (k + 1)..arr.len() {
            prop_assert_eq!(arr[i], values[i - 1]);
        }
    }

    #[test]
    fn failed_calls_leave_state_untouched(values in arb_values(), past in 1usize..10) {
        let mut arr: ResizableArray<i32> = values.iter().copied().collect();
        let cap = arr.capacity();
        let len = values.len();
        prop_assert_eq!(
            arr.insert(len + past, 0),
            Err(ArrayError::IndexOutOfRange { index: len + past, len })
        );
        prop_assert_eq!(
            arr.at(len + past - 1),
            Err(ArrayError::IndexOutOfRange { index: len + past - 1, len })
        );
        prop_assert_eq!(arr.capacity(), cap);
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn growth_at_least_doubles(values in prop::collection::vec(any::<i32>(), 1..64)) {
        let mut arr = ResizableArray::new();
        for &v in &values {
            let before = arr.capacity();
            let full = arr.len() == before;
            arr.push(v);
            if full {
                prop_assert!(arr.capacity() >= 2 * before);
            } else {
                prop_assert_eq!(arr.capacity(), before);
            }
            prop_assert!(arr.len() <= arr.capacity());
        }
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn clone_is_independent(values in arb_values(), extra in any::<i32>()) {
        let original: ResizableArray<i32> = values.iter().copied().collect();
        let mut copy = original.clone();
        copy.push(extra);
        prop_assert_eq!(original.len(), values.len());
        prop_assert_eq!(copy.len(), values.len() + 1);
        prop_assert_eq!(original.as_slice(), values.as_slice());
        prop_assert!(copy.capacity() >= original.capacity());
    }

    #[test]
    fn matches_vec_model(ops in prop::collection::vec(arb_op(), 0..128)) {
        let mut arr = ResizableArray::new();
        let mut model: Vec<i32> = Vec::new();
        for op in ops {
            match op {
                Op::Push(v) => {
                    arr.push(v);
                    model.push(v);
                }
                Op::Pop => {
                    prop_assert_eq!(arr.pop().ok(), model.pop());
                }
                Op::Insert(i, v) => {
                    let result = arr.insert(i, v);
                    if i <= model.len() {
                        prop_assert!(result.is_ok());
                        model.insert(i, v);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Remove(i) => {
                    let result = arr.remove(i);
                    if i < model.len() {
                        prop_assert_eq!(result, Ok(model.remove(i)));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Clear => {
                    let cap = arr.capacity();
                    arr.clear();
                    model.clear();
                    prop_assert_eq!(arr.capacity(), cap);
                }
            }
            prop_assert_eq!(arr.as_slice(), model.as_slice());
        }
    }
}
