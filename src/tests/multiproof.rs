//! Randomized checks of multiproofs against trees of various shapes

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{
    compute_root, merkleize, Gindex, Hasher, Multiproof, Node, Sha256Hasher, WitnessPlan,
};

/// Full tree of the given depth with random leaves.
fn random_full_tree(rng: &mut StdRng, depth: u32) -> Node<32> {
    if depth == 0 {
        return Node::new_leaf(rng.gen());
    }
    Node::new_branch(
        random_full_tree(rng, depth - 1),
        random_full_tree(rng, depth - 1),
    )
}

/// Tree whose leaves sit at random depths, at most `max_depth`.
fn random_ragged_tree(rng: &mut StdRng, max_depth: u32) -> Node<32> {
    if max_depth == 0 || rng.gen_bool(0.3) {
        return Node::new_leaf(rng.gen());
    }
    Node::new_branch(
        random_ragged_tree(rng, max_depth - 1),
        random_ragged_tree(rng, max_depth - 1),
    )
}

/// Every gindex present in the tree.
fn all_gindices(node: &Node<32>, gindex: Gindex, out: &mut Vec<Gindex>) {
    out.push(gindex);
    if let Ok((left, right)) = node.children() {
        all_gindices(left, gindex.left_child().unwrap(), out);
        all_gindices(right, gindex.right_child().unwrap(), out);
    }
}

fn leaf_gindices(depth: u32) -> Vec<Gindex> {
    (1u64 << depth..1u64 << (depth + 1))
        .map(|value| Gindex::new(value).unwrap())
        .collect()
}

fn check_plan(plan: &WitnessPlan) {
    for witness in plan.witnesses() {
        assert!(plan.interest().contains(&witness.sibling().unwrap()));
        assert!(!plan.interest().contains(witness));
    }
    for gindex in plan.interest() {
        let sibling = gindex.sibling().unwrap();
        assert!(plan.interest().contains(&sibling) || plan.witnesses().contains(&sibling));
    }
    let witnesses: BTreeSet<Gindex> = plan.witnesses().iter().copied().collect();
    assert_eq!(witnesses.len(), plan.witnesses().len());
    assert!(plan.witnesses().windows(2).all(|pair| pair[0] < pair[1]));
}

fn check_proof(tree: &Node<32>, targets: &[Gindex]) {
    let plan = WitnessPlan::new(targets.iter().copied());
    check_plan(&plan);
    let proof = Multiproof::from_plan(tree, &plan, &Sha256Hasher);
    assert!(proof.is_complete());
    let known = proof
        .leaves()
        .iter()
        .chain(proof.witnesses())
        .map(|entry| (entry.gindex, entry.value.unwrap()));
    assert_eq!(
        compute_root(known, &Sha256Hasher).unwrap(),
        tree.merkle_root(&Sha256Hasher)
    );
    proof
        .verify(&tree.merkle_root(&Sha256Hasher), &Sha256Hasher)
        .unwrap();
}

#[test]
fn test_full_trees_random_leaves() {
    let mut rng = StdRng::seed_from_u64(0x6e1d);
    for _ in 0..200 {
        let depth = rng.gen_range(1..=8);
        let tree = random_full_tree(&mut rng, depth);
        let leaves = leaf_gindices(depth);
        let amount = rng.gen_range(1..=leaves.len());
        let targets: Vec<Gindex> = leaves.choose_multiple(&mut rng, amount).copied().collect();
        check_proof(&tree, &targets);
    }
}

#[test]
fn test_ragged_trees_random_nodes() {
    let mut rng = StdRng::seed_from_u64(0xa11a5);
    for _ in 0..200 {
        let tree = random_ragged_tree(&mut rng, 10);
        let mut gindices = Vec::new();
        all_gindices(&tree, Gindex::ROOT, &mut gindices);
        // root excluded: it is no target for the witness builder
        let candidates: Vec<Gindex> = gindices.into_iter().filter(|g| !g.is_root()).collect();
        if candidates.is_empty() {
            continue;
        }
        let amount = rng.gen_range(1..=candidates.len().min(6));
        let targets: Vec<Gindex> = candidates
            .choose_multiple(&mut rng, amount)
            .copied()
            .collect();
        check_proof(&tree, &targets);
    }
}

#[test]
fn test_single_leaf_is_auth_path() {
    let mut rng = StdRng::seed_from_u64(7);
    for depth in 1..=10 {
        let tree = random_full_tree(&mut rng, depth);
        let target = *leaf_gindices(depth).choose(&mut rng).unwrap();
        let plan = WitnessPlan::new([target]);
        let expected: Vec<Gindex> = {
            let mut path: Vec<Gindex> = target
                .path_from_root()
                .map(|gindex| gindex.sibling().unwrap())
                .collect();
            path.sort();
            path
        };
        assert_eq!(plan.witnesses(), expected.as_slice());
        assert_eq!(plan.witnesses().len(), depth as usize);
        check_proof(&tree, &[target]);
    }
}

#[test]
fn test_concrete_depth_3_scenario() {
    let mut rng = StdRng::seed_from_u64(3);
    let tree = random_full_tree(&mut rng, 3);
    let h = Sha256Hasher;
    let g = |value: u64| Gindex::new(value).unwrap();
    let value = |gindex: u64| tree.get(g(gindex)).unwrap().merkle_root(&h);

    let plan = WitnessPlan::new([g(9), g(12)]);
    let interest: Vec<u64> = plan.interest().iter().map(|g| g.value()).collect();
    assert_eq!(interest, vec![2, 3, 4, 6, 9, 12]);
    let witnesses: Vec<u64> = plan.witnesses().iter().map(|g| g.value()).collect();
    assert_eq!(witnesses, vec![5, 7, 8, 13]);

    let rebuilt = h.hash_pair(
        &h.hash_pair(&h.hash_pair(&value(8), &value(9)), &value(5)),
        &h.hash_pair(&h.hash_pair(&value(12), &value(13)), &value(7)),
    );
    assert_eq!(rebuilt, tree.merkle_root(&h));
}

#[test]
fn test_overlapping_targets() {
    let g = |value: u64| Gindex::new(value).unwrap();
    let overlapping = WitnessPlan::new([g(9), g(9), g(4)]);
    let union = WitnessPlan::new([g(9), g(4), g(2)]);
    assert_eq!(overlapping.interest(), union.interest());
    assert_eq!(overlapping.witnesses(), union.witnesses());
    let mut rng = StdRng::seed_from_u64(11);
    let tree = random_full_tree(&mut rng, 3);
    check_proof(&tree, &[g(9), g(9), g(4)]);
}

#[test]
fn test_merkleized_bytes() {
    let mut rng = StdRng::seed_from_u64(0xb17e5);
    for _ in 0..50 {
        let len = rng.gen_range(0..600);
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let tree = merkleize(&data, None, &Sha256Hasher).unwrap();
        let chunks = data.len().div_ceil(32).max(1);
        let depth = crate::min_depth(chunks);
        // chunk gindices are always materialized
        let targets: Vec<Gindex> = (0..chunks as u64)
            .filter(|_| rng.gen_bool(0.5))
            .map(|i| Gindex::new((1 << depth) + i).unwrap())
            .collect();
        if targets.is_empty() {
            continue;
        }
        check_proof(&tree, &targets);
    }
}
