use super::*;
use crate::{
    config::GreetingConfig, session::greeting::GreetingSession,
    text::layout::FixedAdvanceMeasurer,
};

fn session() -> GreetingSession<FixedAdvanceMeasurer> {
    let cfg = GreetingConfig::default();
    let m = cfg.text.fixed_measurer().unwrap();
    GreetingSession::new(cfg, m, vec!["sink/a.jpg".into()], Vec::new()).unwrap()
}

#[test]
fn recording_sink_mounts_missing_paper_nodes() {
    let mut s = session();
    s.open_note("hi");
    let snap = s.snapshot();
    assert_eq!(snap.paper.as_ref().map(|p| p.segments.len()), Some(0));

    let mut sink = RecordingSink::new();
    let report = sink.present(&snap).unwrap();
    assert_eq!(report.attached, SegmentId::ALL.to_vec());
    assert!(report.detached.is_empty());

    s.tick(0.0, &mut sink);
    let snap = s.snapshot();
    assert_eq!(snap.paper.as_ref().map(|p| p.segments.len()), Some(5));
    assert!(sink.present(&snap).unwrap().attached.is_empty());
}

#[test]
fn unmounting_paper_reports_detaches() {
    let mut s = session();
    s.open_note("hi");
    let mut sink = RecordingSink::new();
    s.tick(0.0, &mut sink);
    sink.mount_paper(false);
    let report = sink.present(&s.snapshot()).unwrap();
    assert_eq!(report.detached.len(), 5);
    assert!(report.attached.is_empty());
}

#[test]
fn capacity_limit_keeps_latest_frames() {
    let mut s = session();
    let mut sink = RecordingSink::new().with_capacity_limit(3);
    for _ in 0..10 {
        s.tick(0.01, &mut sink);
    }
    assert_eq!(sink.frames().len(), 3);
    assert_eq!(sink.last().map(|f| f.frame), Some(10));
    assert_eq!(sink.frames()[0].frame, 8);
}

#[test]
fn snapshot_serializes_without_poster_payload() {
    let mut s = session();
    let json = serde_json::to_value(s.snapshot()).unwrap();
    assert!(json["grid"]["rows"].is_array());
    assert!(json["grid"].get("posters").is_none());
    assert_eq!(json["open_state"], "Closed");
    assert!(json["fault"].is_null());
}
