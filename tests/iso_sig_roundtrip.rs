mod util;
use util::*;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tri_sieve::prelude::*;

fn check_signature<const N: usize>(seed: u64, size: usize, density: f64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let tri = random_triangulation::<N, _>(&mut rng, size, density);
    let (sig, iso) = tri.iso_sig_with_isomorphism();
    let decoded = Triangulation::<N>::from_iso_sig(&sig).unwrap();
    assert_eq!(decoded.size(), tri.size());
    assert_eq!(decoded.iso_sig(), sig);
    assert!(iso.apply(&tri).unwrap().is_identical_to(&decoded));

    let mut shuffled = tri.clone();
    shuffled.randomise_labelling(&mut rng);
    assert_eq!(shuffled.iso_sig(), sig);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn surfaces_round_trip(seed in any::<u64>(), size in 1usize..8, density in 0.2f64..1.0) {
        check_signature::<3>(seed, size, density);
    }

    #[test]
    fn three_manifolds_round_trip(seed in any::<u64>(), size in 1usize..6, density in 0.2f64..1.0) {
        check_signature::<4>(seed, size, density);
    }

    #[test]
    fn four_manifolds_round_trip(seed in any::<u64>(), size in 1usize..4, density in 0.2f64..1.0) {
        check_signature::<5>(seed, size, density);
    }
}

#[test]
fn fixture_signatures() {
    assert_eq!(sphere2().iso_sig(), "czababa");
    assert_eq!(mobius().iso_sig(), "bcad");
    assert_eq!(punctured_torus().iso_sig(), "fewiaaeedeef");
    assert_eq!(folded_tetrahedron().iso_sig(), "bcaaj");
    assert_eq!(lens_3_1().iso_sig(), "cxcaabbabk");
}

#[test]
fn fixtures_decode_to_isomorphic_copies() {
    let decoded = Triangulation3::from_iso_sig("cxcaabbabk").unwrap();
    assert!(decoded.is_isomorphic_to(&lens_3_1()).is_some());
    assert!(decoded.is_closed());
    assert_eq!(decoded.count_vertices(), 1);

    let band = Triangulation2::from_iso_sig("bcad").unwrap();
    assert!(!band.is_orientable());
    assert_eq!(band.count_boundary_components(), 1);
}

#[test]
fn disconnected_signature_sorts_components() {
    let mut tri = lens_3_1();
    tri.insert_triangulation(&folded_tetrahedron());
    let sig = tri.iso_sig();
    assert_eq!(sig, "bcaajcxcaabbabk");

    let mut other = folded_tetrahedron();
    other.insert_triangulation(&lens_3_1());
    assert_eq!(other.iso_sig(), sig);

    let decoded = Triangulation3::from_iso_sig(&sig).unwrap();
    assert_eq!(decoded.count_components(), 2);
    assert_eq!(decoded.size(), 3);
}

#[test]
fn reflection_keeps_signature() {
    let mut tri = punctured_torus();
    let sig = tri.iso_sig();
    tri.reflect();
    assert_eq!(tri.iso_sig(), sig);
}

#[test]
fn signature_separates_classes() {
    let sigs = [
        sphere2().iso_sig(),
        mobius().iso_sig(),
        punctured_torus().iso_sig(),
    ];
    assert!(sigs.iter().all(|s| sigs.iter().filter(|t| *t == s).count() == 1));
}

#[test]
fn wrong_dimension_signature_is_rejected() {
    // read as tetrahedra the sphere runs out of characters
    assert!(Triangulation2::from_iso_sig("czababa").is_ok());
    assert!(Triangulation3::from_iso_sig("czababa").is_err());
}

/// `n` triangles in a row, each edge 0 glued to edge 1 of the next.
fn triangle_strip(n: usize) -> Triangulation2 {
    let mut tri = Triangulation2::new();
    tri.new_simplices(n);
    for s in 1..n {
        tri.join(s - 1, 0, s, Perm::transposition(0, 1)).unwrap();
    }
    tri
}

#[test]
fn sizes_from_63_use_the_wide_header() {
    // a strip has no joins back, so the body is exactly the trit area
    for (n, header, len) in [(62, "+", 63), (63, "-b-", 66), (64, "-cab", 68)] {
        let tri = triangle_strip(n);
        let (sig, iso) = tri.iso_sig_with_isomorphism();
        assert!(sig.starts_with(header), "{n}: {sig}");
        assert_eq!(sig.len(), len);

        let decoded = Triangulation2::from_iso_sig(&sig).unwrap();
        assert_eq!(decoded.size(), n);
        assert_eq!(decoded.iso_sig(), sig);
        assert!(iso.apply(&tri).unwrap().is_identical_to(&decoded));
        assert!(decoded.is_isomorphic_to(&tri).is_some());
    }
}
