use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..32 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn next_below_stays_in_bounds() {
    let mut rng = Rng64::new(7);
    for n in 1..20 {
        for _ in 0..50 {
            assert!(rng.next_below(n) < n);
        }
    }
    assert_eq!(rng.next_below(0), 0);
}

#[test]
fn range_respects_bounds() {
    let mut rng = Rng64::new(3);
    for _ in 0..100 {
        let v = rng.range(-2.0, 5.0);
        assert!((-2.0..5.0).contains(&v));
    }
}
