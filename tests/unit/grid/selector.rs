use super::*;

#[test]
fn row_zero_wraps_by_modulo() {
    let pool = ["A", "B", "C"];
    let picks: Vec<&str> = (0..5).map(|slot| select(&pool, 0, slot)).collect();
    assert_eq!(picks, vec!["A", "B", "C", "A", "B"]);
    let again: Vec<&str> = (0..5).map(|slot| select(&pool, 0, slot)).collect();
    assert_eq!(picks, again);
}

#[test]
fn selection_is_idempotent_over_many_keys() {
    let pool: Vec<String> = (0..7).map(|i| format!("img-{i}.jpg")).collect();
    for row in 0..6 {
        for slot in 0..12 {
            assert_eq!(select(&pool, row, slot), select(&pool, row, slot));
        }
    }
}

#[test]
fn adjacent_rows_are_shifted() {
    let pool = ["A", "B", "C", "D", "E", "F", "G"];
    assert_ne!(select(&pool, 0, 0), select(&pool, 1, 0));
}

#[test]
fn empty_pool_uses_placeholders_deterministically() {
    let empty: [&str; 0] = [];
    let a = select(&empty, 2, 4);
    assert!(PLACEHOLDER_POSTERS.contains(&a));
    assert_eq!(a, select(&empty, 2, 4));
}

#[test]
fn memoized_selector_matches_pure_rule() {
    let pool: Vec<String> = ["x", "y", "z", "w"].iter().map(|s| s.to_string()).collect();
    let mut sel = ImageSelector::new(pool.clone());
    for row in 0..4 {
        for slot in 0..9 {
            let memo = sel.select(row, slot).to_string();
            assert_eq!(memo, select(&pool, row, slot));
            assert_eq!(sel.select(row, slot), memo);
        }
    }
    assert_eq!(sel.memo_len(), 36);
}

#[test]
fn fingerprint_follows_pool_contents() {
    let a = ImageSelector::new(vec!["a".into(), "b".into()]);
    let b = ImageSelector::new(vec!["a".into(), "b".into()]);
    let c = ImageSelector::new(vec!["b".into(), "a".into()]);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert!(ImageSelector::new(Vec::new()).uses_placeholders());
}

#[test]
fn select_index_has_no_slot_in_an_empty_pool() {
    assert_eq!(select_index(0, 0, 0), None);
    assert_eq!(select_index(0, 9, 4), None);
    assert_eq!(select_index(3, 0, 4), Some(1));
    assert_eq!(select_index(7, 1, 0), Some(ROW_SHIFT));
}
