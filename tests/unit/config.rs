use super::*;
use crate::grid::planner::BreakpointClass;

#[test]
fn empty_object_is_the_default_config() {
    let cfg = GreetingConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, GreetingConfig::default());
    assert_eq!(cfg.grid.settle_secs, 0.15);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = GreetingConfig::from_json_str(
        r#"{ "fold": { "stage_one_secs": 1.0 }, "paper": { "width": 6.0 }, "shuffle": { "seed": 42 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.fold.stage_one_secs, 1.0);
    assert_eq!(cfg.fold.reverse_scale, FoldTiming::default().reverse_scale);
    assert_eq!(cfg.paper.width, 6.0);
    assert_eq!(cfg.paper.height, PaperDims::default().height);
    assert_eq!(cfg.shuffle.seed, 42);
}

#[test]
fn breakpoints_parse_and_validate() {
    let cfg = GreetingConfig::from_json_str(
        r#"{ "grid": { "breakpoints": [
            { "class": "Small", "max_width": 600.0, "row_count": 3, "items_per_row": 4 },
            { "class": "Wide", "max_width": null, "row_count": 6, "items_per_row": 9 }
        ] } }"#,
    )
    .unwrap();
    assert_eq!(cfg.grid.breakpoints.classify(2000.0).class, BreakpointClass::Wide);
    assert_eq!(cfg.grid.breakpoints.classify(100.0).class, BreakpointClass::Small);
}

#[test]
fn invalid_values_are_rejected() {
    let err = GreetingConfig::from_json_str(r#"{ "grid": { "settle_secs": 0.01 } }"#).unwrap_err();
    assert!(matches!(err, FoldError::Validation(_)));

    let err = GreetingConfig::from_json_str(r#"{ "text": { "font_size_px": 0.0 } }"#).unwrap_err();
    assert!(matches!(err, FoldError::Validation(_)));

    let err = GreetingConfig::from_json_str(
        r#"{ "grid": { "breakpoints": [
            { "class": "Small", "max_width": 480.0, "row_count": 2, "items_per_row": 3 },
            { "class": "Small", "max_width": 1024.0, "row_count": 6, "items_per_row": 9 },
            { "class": "Wide", "max_width": null, "row_count": 7, "items_per_row": 10 }
        ] } }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("more than once"));

    let err = GreetingConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, FoldError::Serde(_)));
}

#[test]
fn fixed_measurer_follows_style() {
    let style = TextStyle::default();
    let m = style.fixed_measurer().unwrap();
    assert_eq!(m.line_height, style.line_height_px);
    assert_eq!(m.max_width, style.max_line_width_px);
}
