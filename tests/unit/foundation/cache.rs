use super::*;

#[test]
fn first_write_wins() {
    let cache = AppendOnlyCache::<&str, u32>::default();
    assert_eq!(*cache.insert("a", 1), 1);
    assert_eq!(*cache.insert("a", 2), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn get_or_insert_with_skips_compute_on_hit() {
    let cache = AppendOnlyCache::<u8, String>::default();
    let first = cache.get_or_insert_with(1, || "one".to_string());
    let second = cache.get_or_insert_with(1, || panic!("must not recompute"));
    assert!(Arc::ptr_eq(&first, &second));
}
