use super::*;
use crate::grid::planner::{BreakpointTable, plan};

fn pool(tag: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{tag}/poster-{i}.jpg")).collect()
}

#[test]
fn ids_depend_only_on_coordinates_and_pool_size() {
    assert_eq!(poster_id(1, 2, 9), poster_id(1, 2, 9));
    assert_ne!(poster_id(1, 2, 9), poster_id(2, 1, 9));
    assert_ne!(poster_id(1, 2, 9), poster_id(1, 2, 10));
}

#[test]
fn rows_follow_the_plan() {
    let p = plan(800.0, &BreakpointTable::default());
    let mut sel = ImageSelector::new(pool("posters-plan", 5));
    let rows = build_rows(&mut sel, 5, &p);
    assert_eq!(rows.len(), p.row_count);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.config.row, i);
        assert_eq!(row.cells.len(), row.config.poster_count);
        assert!(row.cells.iter().enumerate().all(|(slot, c)| c.slot == slot && c.row == i));
    }
}

#[test]
fn remount_reproduces_identical_cells() {
    let p = plan(1500.0, &BreakpointTable::default());
    let a = PosterWall::new(pool("posters-remount", 11)).rows(&p);
    let b = PosterWall::new(pool("posters-remount", 11)).rows(&p);
    assert!(Arc::ptr_eq(&a, &b));

    let mut sel = ImageSelector::new(pool("posters-remount", 11));
    assert_eq!(*a, build_rows(&mut sel, 11, &p));
}

#[test]
fn different_pools_get_different_walls() {
    let p = plan(500.0, &BreakpointTable::default());
    let a = PosterWall::new(pool("posters-a", 4)).rows(&p);
    let b = PosterWall::new(pool("posters-b", 4)).rows(&p);
    assert_ne!(a.as_ref(), b.as_ref());
}

#[test]
fn empty_pool_still_fills_the_wall() {
    let p = plan(300.0, &BreakpointTable::default());
    let rows = PosterWall::new(Vec::new()).rows(&p);
    assert!(rows.iter().all(|r| !r.cells.is_empty()));
    assert!(
        rows.iter()
            .flat_map(|r| &r.cells)
            .all(|c| c.image.starts_with("placeholder/"))
    );
}
