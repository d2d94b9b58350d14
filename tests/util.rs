#![allow(dead_code)]
use rand::Rng;
use tri_sieve::prelude::*;

pub fn perm<const N: usize>(images: [u8; N]) -> Perm<N> {
    Perm::from_images(images).unwrap()
}

/// Two triangles glued along all three edges by the identity.
pub fn sphere2() -> Triangulation2 {
    let mut tri = Triangulation2::new();
    tri.new_simplices(2);
    for f in 0..3 {
        tri.join(0, f, 1, Perm::identity()).unwrap();
    }
    tri
}

/// One triangle with edge 0 folded onto edge 2.
pub fn mobius() -> Triangulation2 {
    let mut tri = Triangulation2::new();
    tri.new_simplex();
    tri.join(0, 0, 0, perm([2, 0, 1])).unwrap();
    tri
}

/// Once-punctured torus: an annulus between the square `a b a⁻¹ b⁻¹` and a
/// one-edge boundary loop, fanned into five triangles.
pub fn punctured_torus() -> Triangulation2 {
    let mut tri = Triangulation2::new();
    tri.new_simplices(5);
    let swap = perm([0, 2, 1]);
    tri.join(0, 1, 1, swap).unwrap();
    tri.join(1, 1, 2, swap).unwrap();
    tri.join(2, 1, 3, swap).unwrap();
    tri.join(0, 2, 4, Perm::identity()).unwrap();
    tri.join(3, 1, 4, perm([2, 0, 1])).unwrap();
    tri.join(0, 0, 2, swap).unwrap();
    tri.join(1, 0, 3, swap).unwrap();
    tri
}

/// One tetrahedron with facet 3 folded onto facet 2.
pub fn folded_tetrahedron() -> Triangulation3 {
    let mut tri = Triangulation3::new();
    tri.new_simplex();
    tri.join(0, 3, 0, perm([1, 3, 0, 2])).unwrap();
    tri
}

/// Two-tetrahedron one-vertex triangulation of the lens space L(3,1).
pub fn lens_3_1() -> Triangulation3 {
    let adj = [[1, 0, 1, 0], [0, 1, 1, 0]];
    let gluing = [
        [[3, 1, 0, 2], [2, 3, 1, 0], [3, 1, 0, 2], [3, 2, 0, 1]],
        [[2, 1, 3, 0], [0, 2, 1, 3], [0, 2, 1, 3], [2, 1, 3, 0]],
    ];
    let mut tri = Triangulation3::new();
    tri.insert_construction(&adj, &gluing).unwrap();
    tri
}

/// `size` simplices with each facet glued with probability `density` to a
/// random free facet under a random permutation.
pub fn random_triangulation<const N: usize, R: Rng>(
    rng: &mut R,
    size: usize,
    density: f64,
) -> Triangulation<N> {
    let mut tri = Triangulation::<N>::new();
    tri.new_simplices(size);
    for s in 0..size {
        for f in 0..N {
            if tri[s].adjacent_simplex(f).is_some() || !rng.gen_bool(density) {
                continue;
            }
            let free: Vec<(usize, usize)> = (0..size)
                .flat_map(|t| (0..N).map(move |g| (t, g)))
                .filter(|&(t, g)| (t, g) != (s, f) && tri[t].adjacent_simplex(g).is_none())
                .collect();
            if free.is_empty() {
                continue;
            }
            let (t, g) = free[rng.gen_range(0..free.len())];
            let choices: Vec<Perm<N>> = Perm::<N>::all().filter(|p| p.image(f) == g).collect();
            let p = choices[rng.gen_range(0..choices.len())];
            tri.join(s, f, t, p).unwrap();
        }
    }
    tri
}
