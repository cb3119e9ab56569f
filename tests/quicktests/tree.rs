use std::collections::BTreeMap;
use std::ops::Bound;

use bst_index::Tree;
use quickcheck::quickcheck;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::Op;

/// Applies a set of operations to a tree and to a `BTreeMap` counting each
/// key, so duplicates are tracked too.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i8>, model: &mut BTreeMap<i8, usize>, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for op in ops {
        match *op {
            Op::Insert(k) => {
                tree.insert(k, (), &mut rng);
                *model.entry(k).or_default() += 1;
            }
            Op::Remove(k) => {
                let removed = tree.delete_key(&k).is_ok();
                assert_eq!(removed, model.contains_key(&k));
                if let Some(count) = model.get_mut(&k) {
                    *count -= 1;
                    if *count == 0 {
                        model.remove(&k);
                    }
                }
            }
            Op::Neighbours(k) => {
                let Some(node) = tree.search(&k) else {
                    continue;
                };
                let expected = model
                    .range((Bound::Excluded(k), Bound::Unbounded))
                    .next().map(|(k, _)| *k);
                let next = tree.successor(node.id()).unwrap();
                match next {
                    // An equal key may sit between this node and the next
                    // larger one.
                    Some(next) if *next.key() == k => {}
                    Some(next) => assert_eq!(Some(*next.key()), expected),
                    None => assert!(expected.is_none()),
                }
            }
        }
    }
}

quickcheck! {
    fn tree_matches_btreemap(ops: Vec<Op<i8>>, seed: u64) -> bool {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();

        do_ops(&ops, &mut tree, &mut model, seed);

        let expected: Vec<i8> = model
            .iter()
            .flat_map(|(k, count)| std::iter::repeat(*k).take(*count))
            .collect();
        tree.check_invariants().is_ok()
            && tree.len() == expected.len()
            && tree.keys().copied().eq(expected)
    }

    fn rank_matches_btreemap(xs: Vec<i8>, probe: i8, seed: u64) -> bool {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = Tree::new();
        tree.insert_many(xs.iter().map(|x| (*x, ())), &mut rng);

        let mut model: BTreeMap<i8, usize> = BTreeMap::new();
        for x in &xs {
            *model.entry(*x).or_default() += 1;
        }
        tree.rank(&probe) == model.range(..probe).map(|(_, count)| count).sum::<usize>()
    }

    fn deleting_keeps_other_handles(xs: Vec<i8>, seed: u64) -> bool {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = Tree::new();
        let ids: Vec<_> = xs.iter().map(|x| tree.insert(*x, (), &mut rng)).collect();

        let (gone, kept): (Vec<_>, Vec<_>) = ids.iter().enumerate().partition(|(i, _)| i % 2 == 0);
        for (_, id) in &gone {
            tree.delete(**id).unwrap();
        }

        gone.iter().all(|(_, id)| tree.get(**id).is_err())
            && kept.iter().all(|(i, id)| tree.get(**id).map(|n| *n.key()).ok() == Some(xs[*i]))
            && tree.check_invariants().is_ok()
    }
}
