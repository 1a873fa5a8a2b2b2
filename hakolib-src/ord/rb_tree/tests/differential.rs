//! Random operation sequences, checked against the sorted-vec model.

use flat_map::FlatMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use randgen::{Gen, KeyRuns, UniqueKeys};
use rb_tree::RbTree;

#[test]
fn unique_tree_matches_model() {
    let mut rng = ChaCha20Rng::from_seed([0x5E; 32]);
    let keys = UniqueKeys { bound: 0..500, len: 300 }.generate(&mut rng);

    let mut tree = RbTree::new();
    let mut model = FlatMap::new();
    for (i, &k) in keys.iter().enumerate() {
        assert_eq!(
            tree.insert_unique(k, i).is_ok(),
            model.insert_unique(k, i),
            "insert verdicts diverged at key {k}"
        );
        if i % 16 == 0 {
            tree.assert_invariants();
        }
    }
    assert_eq!(tree.len(), model.len());

    // random interleaving of lookups and removals
    for _ in 0..1000 {
        let k = (0..600).generate(&mut rng);
        match rng.gen_range(0..3) {
            0 => assert_eq!(tree.get(&k), model.get(&k)),
            1 => assert_eq!(tree.contains(&k), model.contains(&k)),
            _ => {
                assert_eq!(tree.remove(&k), model.remove_first(&k));
                tree.assert_invariants();
            }
        }
        assert_eq!(tree.len(), model.len());
    }

    let tree_pairs: Vec<_> = tree.iter().map(|(&k, &v)| (k, v)).collect();
    let model_pairs: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(tree_pairs, model_pairs);
}

#[test]
fn multi_tree_matches_model() {
    let mut rng = ChaCha20Rng::from_seed([0xA3; 32]);
    let keys = KeyRuns { distinct: 100, max_run: 5 }.generate(&mut rng);

    let mut tree = RbTree::new();
    let mut model = FlatMap::new();
    for (i, &k) in keys.iter().enumerate() {
        tree.insert_multi(k, i);
        model.insert_multi(k, i);
        if i % 16 == 0 {
            tree.assert_invariants();
        }
    }
    for k in 0..100 {
        assert_eq!(tree.count(&k), model.count(&k), "count diverged at {k}");
    }

    for _ in 0..500 {
        let k = (0..110).generate(&mut rng);
        assert_eq!(tree.remove(&k), model.remove_first(&k));
        assert_eq!(tree.len(), model.len());
    }
    tree.assert_invariants();

    let tree_keys: Vec<_> = tree.iter().map(|(&k, _)| k).collect();
    let model_keys: Vec<_> = model.iter().map(|(&k, _)| k).collect();
    assert_eq!(tree_keys, model_keys);
}

#[test]
fn size_is_inserts_minus_removes() {
    let mut rng = ChaCha20Rng::from_seed([0x11; 32]);
    let mut tree = RbTree::new();
    let mut inserted = 0usize;
    let mut removed = 0usize;
    for _ in 0..2000 {
        let k = (0..200).generate(&mut rng);
        if rng.gen_bool(0.6) {
            if tree.insert_unique(k, ()).is_ok() {
                inserted += 1;
            }
        } else if tree.remove(&k).is_some() {
            removed += 1;
        }
        assert_eq!(tree.len(), inserted - removed);
    }
    tree.assert_invariants();
}
