use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tri_sieve::prelude::*;

/// Glues free facets of `size` tetrahedra in random pairs until at most one
/// is left.
fn random_closed(size: usize, seed: u64) -> Triangulation3 {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut tri = Triangulation3::new();
    tri.new_simplices(size);
    let mut free: Vec<(usize, usize)> = (0..size).flat_map(|s| (0..4).map(move |f| (s, f))).collect();
    while free.len() >= 2 {
        let (s, f) = free.swap_remove(rng.gen_range(0..free.len()));
        let (t, g) = free.swap_remove(rng.gen_range(0..free.len()));
        let choices: Vec<Perm<4>> = Perm::<4>::all().filter(|p| p.image(f) == g).collect();
        let p = choices[rng.gen_range(0..choices.len())];
        if tri.join(s, f, t, p).is_err() {
            break;
        }
    }
    tri
}

fn bench_iso_sig(c: &mut Criterion) {
    let mut group = c.benchmark_group("iso_sig");

    for &size in &[4usize, 16, 64] {
        let tri = random_closed(size, 17);
        let sig = tri.iso_sig();

        group.bench_with_input(BenchmarkId::new("encode", size), &size, |b, _| {
            b.iter(|| black_box(tri.iso_sig()));
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &size, |b, _| {
            b.iter(|| black_box(Triangulation3::from_iso_sig(&sig)));
        });

        group.bench_with_input(BenchmarkId::new("make_canonical", size), &size, |b, _| {
            b.iter(|| {
                let mut copy = tri.clone();
                black_box(copy.make_canonical());
            });
        });

        group.bench_with_input(BenchmarkId::new("skeleton", size), &size, |b, _| {
            b.iter(|| black_box(Skeleton::build(tri.simplices()).f_vector()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_iso_sig);
criterion_main!(benches);
