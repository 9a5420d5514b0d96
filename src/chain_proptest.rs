#![cfg(test)]

// Property tests for the chain layer kept inside the crate so they can
// exercise the pub(crate) record storage directly.

use crate::chain::Chain;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys and op lists shrink in length. The dedup guard on Push mirrors how
// dict drives the chain: a chain never holds two records with one key.
#[derive(Clone, Debug)]
enum Op {
    Push(u8, u8),
    Remove(u8),
    Find(u8),
    Pop,
}

fn key(n: u8) -> Box<[u8]> {
    Box::from((n as u32).to_le_bytes().as_slice())
}

fn val(n: u8) -> Box<[u8]> {
    Box::from([n, n, n].as_slice())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16, any::<u8>()).prop_map(|(k, v)| Op::Push(k, v)),
        (0u8..16).prop_map(Op::Remove),
        (0u8..16).prop_map(Op::Find),
        Just(Op::Pop),
    ]
}

proptest! {
    // Property: a chain behaves as a set of records keyed by full key
    // bytes, matching a map model under push/remove/find/pop sequences.
    #[test]
    fn prop_chain_matches_map_model(ops in proptest::collection::vec(op_strategy(), 1..200)) {
        let mut chain = Chain::new();
        let mut model: BTreeMap<Box<[u8]>, Box<[u8]>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Push(k, v) => {
                    if !model.contains_key(&key(k)) {
                        chain.push(key(k), val(v));
                        model.insert(key(k), val(v));
                    }
                }
                Op::Remove(k) => {
                    let removed = chain.remove(&key(k));
                    let expected = model.remove(&key(k));
                    match (removed, expected) {
                        (Some(rec), Some(v)) => {
                            prop_assert_eq!(&rec.key, &key(k));
                            prop_assert_eq!(&rec.value, &v);
                        }
                        (None, None) => {}
                        (got, want) => {
                            return Err(TestCaseError::fail(format!(
                                "remove mismatch: chain={:?} model={:?}",
                                got.map(|r| r.key),
                                want
                            )));
                        }
                    }
                }
                Op::Find(k) => {
                    prop_assert_eq!(
                        chain.find(&key(k)).map(|rec| &rec.value),
                        model.get(&key(k))
                    );
                }
                Op::Pop => {
                    // Which record pops is unspecified; only membership and
                    // bytes are asserted.
                    if let Some(rec) = chain.pop() {
                        let v = model.remove(&rec.key);
                        prop_assert_eq!(v.as_ref(), Some(&rec.value));
                    } else {
                        prop_assert!(model.is_empty());
                    }
                }
            }

            prop_assert_eq!(chain.iter().count(), model.len());
        }

        // Drain and compare the surviving record set.
        let mut remaining: Vec<(Box<[u8]>, Box<[u8]>)> = Vec::new();
        while let Some(rec) = chain.pop() {
            remaining.push((rec.key.clone(), rec.value.clone()));
        }
        remaining.sort();
        let expected: Vec<(Box<[u8]>, Box<[u8]>)> =
            model.into_iter().collect();
        prop_assert_eq!(remaining, expected);
    }
}
