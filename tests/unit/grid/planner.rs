use super::*;

fn planner(width: f64) -> GridPlanner {
    GridPlanner::new(width, BreakpointTable::default(), 0.15).unwrap()
}

#[test]
fn widths_inside_one_class_share_a_plan() {
    let table = BreakpointTable::default();
    let reference = plan(480.0, &table);
    let mut w = 480.0;
    while w < 768.0 {
        let p = plan(w, &table);
        assert_eq!(
            (p.row_count, p.items_per_row),
            (reference.row_count, reference.items_per_row)
        );
        assert_eq!(p, reference);
        w += 7.5;
    }
}

#[test]
fn classes_are_step_functions() {
    let table = BreakpointTable::default();
    assert_eq!(table.classify(0.0).class, BreakpointClass::VerySmall);
    assert_eq!(table.classify(479.9).class, BreakpointClass::VerySmall);
    assert_eq!(table.classify(480.0).class, BreakpointClass::Small);
    assert_eq!(table.classify(1023.0).class, BreakpointClass::Tablet);
    assert_eq!(table.classify(1439.0).class, BreakpointClass::Desktop);
    assert_eq!(table.classify(1440.0).class, BreakpointClass::Wide);
    assert_eq!(table.classify(f64::NAN).class, BreakpointClass::VerySmall);
}

#[test]
fn rows_alternate_direction_and_recede() {
    let p = plan(1200.0, &BreakpointTable::default());
    assert_eq!(p.rows.len(), p.row_count);
    for pair in p.rows.windows(2) {
        assert_ne!(pair[0].direction, pair[1].direction);
        assert!(pair[1].depth_offset < pair[0].depth_offset);
    }
    assert_eq!(p.rows[0].direction, ScrollDirection::Left);
    assert!(p.rows.iter().all(|r| r.poster_count > p.items_per_row));
}

#[test]
fn resize_storm_recomputes_once_after_settling() {
    let mut gp = planner(1300.0);
    assert_eq!(gp.current().class, BreakpointClass::Desktop);
    for i in 0..20 {
        gp.resize(900.0 - f64::from(i));
        assert!(!gp.tick(0.05));
    }
    assert_eq!(gp.current().class, BreakpointClass::Desktop);
    assert!(!gp.tick(0.05));
    assert!(gp.tick(0.06));
    assert_eq!(gp.current().class, BreakpointClass::Tablet);
    assert_eq!(gp.computations(), 2);
    assert!(!gp.is_settling());
}

#[test]
fn same_class_resize_is_a_cache_hit() {
    let mut gp = planner(1100.0);
    let before = gp.current().clone();
    gp.resize(1300.0);
    assert!(!gp.tick(1.0));
    assert!(Arc::ptr_eq(&before, gp.current()));
    assert_eq!(gp.computations(), 1);
}

#[test]
fn returning_to_a_seen_class_reuses_its_plan() {
    let mut gp = planner(1100.0);
    let desktop = gp.current().clone();
    gp.resize(600.0);
    assert!(gp.tick(1.0));
    gp.resize(1200.0);
    assert!(gp.tick(1.0));
    assert!(Arc::ptr_eq(&desktop, gp.current()));
    assert_eq!(gp.computations(), 2);
}

#[test]
fn settle_window_has_a_floor() {
    assert!(GridPlanner::new(800.0, BreakpointTable::default(), 0.05).is_err());
}

#[test]
fn table_validation() {
    let bp = |class, max_width, rows| Breakpoint {
        class,
        max_width,
        row_count: rows,
        items_per_row: 3,
    };
    use BreakpointClass::{Small, Tablet, VerySmall, Wide};
    assert!(BreakpointTable::new(vec![]).is_err());
    assert!(BreakpointTable::new(vec![bp(Small, Some(100.0), 2)]).is_err());
    assert!(
        BreakpointTable::new(vec![
            bp(VerySmall, Some(300.0), 2),
            bp(Small, Some(200.0), 2),
            bp(Wide, None, 2)
        ])
        .is_err()
    );
    assert!(BreakpointTable::new(vec![bp(Small, Some(300.0), 0), bp(Wide, None, 2)]).is_err());
    assert!(BreakpointTable::new(vec![bp(Small, Some(300.0), 2), bp(Wide, None, 2)]).is_ok());

    // One class, two shapes: rejected.
    let err = BreakpointTable::new(vec![
        bp(Small, Some(480.0), 2),
        bp(Small, Some(1024.0), 6),
        bp(Tablet, None, 4),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("more than once"));
    assert!(BreakpointTable::new(vec![bp(Wide, Some(480.0), 2), bp(Wide, None, 2)]).is_err());
}

#[test]
fn table_round_trips_through_json_as_a_list() {
    let table = BreakpointTable::default();
    let json = serde_json::to_string(&table).unwrap();
    assert!(json.starts_with('['));
    let back: BreakpointTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
    assert_eq!(back.entries().count(), 5);
    assert!(serde_json::from_str::<BreakpointTable>("[]").is_err());
}

#[test]
fn scroll_offset_wraps_and_follows_direction() {
    let row = RowConfig {
        row: 0,
        direction: ScrollDirection::Left,
        poster_count: 4,
        depth_offset: 0.0,
        speed: 1.0,
    };
    assert_eq!(row.scroll_offset(1.0), -1.0);
    assert_eq!(row.scroll_offset(5.0), -1.0);
    let right = RowConfig {
        direction: ScrollDirection::Right,
        ..row
    };
    assert_eq!(right.scroll_offset(2.5), 2.5);
}
