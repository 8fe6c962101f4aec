use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gindex_merkle::{compute_root, merkleize, Gindex, Multiproof, Node, Sha256Hasher, WitnessPlan};

const DEPTH: u32 = 12;

pub fn generate_random_data(chunks: usize) -> Vec<u8> {
    (0..chunks * 32).map(|_| rand::random()).collect()
}

pub fn generate_random_targets(amount: usize) -> Vec<Gindex> {
    (0..amount)
        .map(|_| Gindex::new((1 << DEPTH) + rand::random::<u64>() % (1 << DEPTH)).unwrap())
        .collect()
}

fn setup_tree() -> Node<32> {
    let tree = merkleize(&generate_random_data(1 << DEPTH), Some(DEPTH), &Sha256Hasher).unwrap();
    tree.merkle_root(&Sha256Hasher);
    tree
}

fn bench_witness_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Witness Plan");
    for amount in [1, 16, 256] {
        let targets = generate_random_targets(amount);
        group.bench_function(format!("{amount} targets"), |b| {
            b.iter(|| black_box(WitnessPlan::new(targets.iter().copied())))
        });
    }
    group.finish();
}

fn bench_multiproof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Multiproof Generation");
    let tree = setup_tree();
    for amount in [1, 16, 256] {
        let targets = generate_random_targets(amount);
        group.bench_function(format!("{amount} targets"), |b| {
            b.iter(|| black_box(Multiproof::generate(&tree, targets.iter().copied(), &Sha256Hasher)))
        });
    }
    group.finish();
}

fn bench_root_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Root Reconstruction");
    let tree = setup_tree();
    for amount in [1, 16, 256] {
        let proof = Multiproof::generate(&tree, generate_random_targets(amount), &Sha256Hasher);
        let known: Vec<(Gindex, [u8; 32])> = proof
            .leaves()
            .iter()
            .chain(proof.witnesses())
            .filter_map(|entry| entry.value.map(|value| (entry.gindex, value)))
            .collect();
        group.bench_function(format!("{amount} targets"), |b| {
            b.iter(|| black_box(compute_root(known.iter().copied(), &Sha256Hasher)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_witness_plan,
    bench_multiproof_generation,
    bench_root_reconstruction
);
criterion_main!(benches);
