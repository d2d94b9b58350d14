use proptest::prelude::*;
use tri_sieve::prelude::*;

fn check_group<const N: usize>(a: usize, b: usize, c: usize) {
    let (p, q, r) = (
        Perm::<N>::from_sn_index(a % Perm::<N>::COUNT),
        Perm::<N>::from_sn_index(b % Perm::<N>::COUNT),
        Perm::<N>::from_sn_index(c % Perm::<N>::COUNT),
    );
    assert_eq!((p * q) * r, p * (q * r));
    assert!((p * p.inverse()).is_identity());
    assert_eq!(p * Perm::identity(), p);
    for i in 0..N {
        // q applies first
        assert_eq!((p * q).image(i), p.image(q.image(i)));
        assert_eq!(p.pre_image(p.image(i)), i);
    }
    assert_eq!((p * q).sign(), p.sign() * q.sign());
    assert_eq!(p.is_even(), p.sn_index() % 2 == 0);
}

fn check_codes<const N: usize>(a: usize) {
    let p = Perm::<N>::from_sn_index(a % Perm::<N>::COUNT);
    assert_eq!(Perm::from_images(p.images()).unwrap(), p);
    assert_eq!(Perm::from_ordered_index(p.ordered_index()), p);
    assert_eq!(Perm::from_perm_code_legacy(p.perm_code_legacy()), Some(p));
    assert_eq!(p.to_string().len(), N);
}

proptest! {
    #[test]
    fn group_laws(a in 0usize..120, b in 0usize..120, c in 0usize..120) {
        check_group::<3>(a, b, c);
        check_group::<4>(a, b, c);
        check_group::<5>(a, b, c);
    }

    #[test]
    fn index_and_code_conversions(a in 0usize..120) {
        check_codes::<3>(a);
        check_codes::<4>(a);
        check_codes::<5>(a);
    }

    #[test]
    fn order_follows_image_tuples(a in 0usize..120, b in 0usize..120) {
        let p = Perm::<5>::from_sn_index(a);
        let q = Perm::<5>::from_sn_index(b);
        prop_assert_eq!(p.cmp(&q), p.images().cmp(&q.images()));
    }

    #[test]
    fn non_permutations_are_rejected(images in proptest::array::uniform4(0u8..6)) {
        let mut seen = [false; 6];
        let bijective = images.iter().all(|&i| i < 4 && !std::mem::replace(&mut seen[i as usize], true));
        prop_assert_eq!(Perm::<4>::from_images(images).is_ok(), bijective);
    }
}

#[test]
fn enumeration_orders() {
    let signed: Vec<Perm<4>> = Perm::all().collect();
    assert_eq!(signed.len(), 24);
    assert!(signed.iter().enumerate().all(|(i, p)| p.is_even() == (i % 2 == 0)));
    let ordered: Vec<Perm<4>> = Perm::all_ordered().collect();
    assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    assert!(ordered[0].is_identity());
    assert_eq!(ordered[23].images(), [3, 2, 1, 0]);
}

#[test]
fn legacy_codes_reject_garbage() {
    // images 0,0,0 is not a bijection
    assert_eq!(Perm::<3>::from_perm_code_legacy(0), None);
    assert_eq!(Perm::<3>::from_perm_code_legacy(1 << 6), None);
    assert_eq!(
        Perm::<5>::from_perm_code_legacy(Perm::<5>::identity().perm_code_legacy()),
        Some(Perm::identity())
    );
}
