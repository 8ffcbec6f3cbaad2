use std::collections::BTreeMap;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use scoretree::{Decrease, Lookup, OrderedTree};

/// Small alphabet and short keys so operations keep colliding with stored keys.
fn random_key(rng: &mut StdRng) -> String {
    let len = rng.gen_range(1..=3);
    (0..len).map(|_| rng.gen_range(b'a'..=b'e') as char).collect()
}

fn brute_force_rank(model: &BTreeMap<String, i64>, key: &str) -> usize {
    model.keys().filter(|k| k.as_str() < key).count()
}

fn assert_matches_model(tree: &OrderedTree, model: &BTreeMap<String, i64>) {
    assert_eq!(tree.verify(), Ok(model.len()));
    let extracted: Vec<(&str, i64)> = tree.iter().map(|e| (e.key(), e.score())).collect();
    let expected: Vec<(&str, i64)> = model.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(extracted, expected);
}

#[test]
fn test_random_operations_match_btreemap() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = OrderedTree::new();
        let mut model: BTreeMap<String, i64> = BTreeMap::new();

        for step in 0..2_000 {
            let key = random_key(&mut rng);
            let amount = rng.gen_range(-50..=50);
            match rng.gen_range(0..6) {
                0 | 1 => {
                    let expected = *model
                        .entry(key.clone())
                        .and_modify(|score| *score += amount)
                        .or_insert(amount);
                    assert_eq!(tree.insert_or_merge(&key, amount), expected, "seed {seed} step {step}");
                }
                2 => {
                    let expected = match model.get_mut(&key) {
                        Some(score) => {
                            *score = (*score - amount).max(0);
                            Decrease::Updated(*score)
                        }
                        None => Decrease::NotFound,
                    };
                    assert_eq!(tree.decrease(&key, amount), expected, "seed {seed} step {step}");
                }
                3 => {
                    if let Some(score) = model.get_mut(&key) {
                        *score = amount;
                    }
                    tree.set_score(&key, amount);
                }
                4 => {
                    assert_eq!(
                        tree.delete(&key),
                        model.remove(&key).is_some(),
                        "seed {seed} step {step}"
                    );
                }
                _ => {
                    match tree.find(&key) {
                        Lookup::Found { score, depth } => {
                            assert_eq!(model.get(&key), Some(&score));
                            assert!(depth < tree.len());
                        }
                        Lookup::NotFound => assert!(!model.contains_key(&key)),
                    }
                }
            }

            assert_eq!(
                tree.count_less_than(&key),
                brute_force_rank(&model, &key),
                "seed {seed} step {step} key {key}"
            );
            assert_eq!(tree.len(), model.len());
        }

        assert_matches_model(&tree, &model);
    }
}

#[test]
fn test_rank_of_every_stored_key_is_its_position() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = OrderedTree::new();
    for _ in 0..500 {
        let key: String = (0..6).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
        tree.insert_or_merge(&key, 1);
    }

    let keys: Vec<String> = tree.iter().map(|e| e.key().to_string()).collect();
    for (position, key) in keys.iter().enumerate() {
        assert_eq!(tree.count_less_than(key), position);
    }
}

#[test]
fn test_deleting_everything_in_random_order_empties_tree() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut keys: Vec<String> = (0..300).map(|i| format!("p{i:04}")).collect();
    keys.shuffle(&mut rng);

    let mut tree = OrderedTree::new();
    for key in &keys {
        tree.insert_or_merge(key, 1);
    }

    keys.shuffle(&mut rng);
    for (removed, key) in keys.iter().enumerate() {
        assert!(tree.delete(key));
        assert_eq!(tree.verify(), Ok(keys.len() - removed - 1));
    }
    assert!(tree.is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, i64),
    Sub(String, i64),
    Del(String),
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key_strategy(), -100i64..100).prop_map(|(k, v)| Op::Add(k, v)),
        2 => (key_strategy(), 0i64..100).prop_map(|(k, v)| Op::Sub(k, v)),
        2 => key_strategy().prop_map(Op::Del),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariants hold after every operation, and the final tree agrees with a `BTreeMap`.
    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op_strategy(), 1..300)) {
        let mut tree = OrderedTree::new();
        let mut model: BTreeMap<String, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                Op::Add(k, v) => {
                    tree.insert_or_merge(k, *v);
                    *model.entry(k.clone()).or_insert(0) += *v;
                }
                Op::Sub(k, v) => {
                    tree.decrease(k, *v);
                    if let Some(score) = model.get_mut(k) {
                        *score = (*score - *v).max(0);
                    }
                }
                Op::Del(k) => {
                    prop_assert_eq!(tree.delete(k), model.remove(k).is_some());
                }
            }
            prop_assert_eq!(tree.verify(), Ok(model.len()));
        }

        for probe in ["", "a", "c", "cc", "f", "z"] {
            prop_assert_eq!(tree.count_less_than(probe), brute_force_rank(&model, probe));
        }
        assert_matches_model(&tree, &model);
    }

    /// Extraction is sorted and complete no matter the insertion order.
    #[test]
    fn extraction_is_sorted(keys in proptest::collection::btree_set("[a-z]{1,8}", 0..100)) {
        let mut shuffled: Vec<&String> = keys.iter().collect();
        shuffled.reverse();
        let mid = shuffled.len() / 3;
        shuffled.rotate_left(mid);

        let mut tree = OrderedTree::new();
        for key in &shuffled {
            tree.insert_or_merge(key, key.len() as i64);
        }

        let extracted: Vec<&str> = tree.iter().map(|e| e.key()).collect();
        let expected: Vec<&str> = keys.iter().map(String::as_str).collect();
        prop_assert_eq!(extracted, expected);
    }
}
