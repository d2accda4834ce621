use super::*;

#[test]
fn fingerprint_is_order_sensitive_and_repeatable() {
    let a = pool_fingerprint(&["a.jpg", "b.jpg"]);
    let b = pool_fingerprint(&["b.jpg", "a.jpg"]);
    assert_ne!(a, b);
    assert_eq!(a, pool_fingerprint(&["a.jpg".to_string(), "b.jpg".to_string()]));
}

#[test]
fn length_prefix_separates_boundaries() {
    assert_ne!(pool_fingerprint(&["ab", "c"]), pool_fingerprint(&["a", "bc"]));
}

#[test]
fn empty_pool_has_a_fingerprint() {
    let empty: [&str; 0] = [];
    assert_eq!(pool_fingerprint(&empty), pool_fingerprint(&empty));
}
