use super::*;

#[test]
fn max_abs_diff_picks_largest_axis() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(1.5, 2.0, 1.0);
    assert_eq!(a.max_abs_diff(b), 2.0);
    assert_eq!(a.max_abs_diff(a), 0.0);
}

#[test]
fn viewport_rejects_non_finite() {
    assert!(Viewport::new(f64::NAN, 10.0).is_err());
    assert!(Viewport::new(10.0, -1.0).is_err());
    assert!(Viewport::new(1280.0, 720.0).is_ok());
}
