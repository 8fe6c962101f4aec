//! Trees over 64-byte digests

use sha2::{Digest, Sha512};

use crate::{dump, Gindex, Hasher, Multiproof, Node};

#[derive(Clone, Copy)]
struct Sha512Hasher;

impl Hasher<64> for Sha512Hasher {
    fn hash_pair(&self, left: &[u8; 64], right: &[u8; 64]) -> [u8; 64] {
        let mut hasher = Sha512::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

fn tree() -> Node<64> {
    let leaf = |byte: u8| Node::new_leaf([byte; 64]);
    Node::new_branch(
        Node::new_branch(leaf(1), leaf(2)),
        Node::new_branch(leaf(3), leaf(4)),
    )
}

#[test]
fn test_root() {
    let h = Sha512Hasher;
    let expected = h.hash_pair(
        &h.hash_pair(&[1; 64], &[2; 64]),
        &h.hash_pair(&[3; 64], &[4; 64]),
    );
    assert_eq!(tree().merkle_root(&h), expected);
}

#[test]
fn test_multiproof() {
    let tree = tree();
    let proof = Multiproof::generate(&tree, [Gindex::new(6).unwrap()], &Sha512Hasher);
    assert_eq!(proof.leaves()[0].value, Some([3; 64]));
    let witnesses: Vec<u64> = proof.witnesses().iter().map(|e| e.gindex.value()).collect();
    assert_eq!(witnesses, vec![2, 7]);
    proof
        .verify(&tree.merkle_root(&Sha512Hasher), &Sha512Hasher)
        .unwrap();
}

#[test]
fn test_dump() {
    let view = dump(&tree(), &Sha512Hasher).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["left"]["left"]["root"], format!("0x{}", "01".repeat(64)));
    assert_eq!(json["root"].as_str().unwrap().len(), 2 + 128);
}
