use super::*;

fn drain(q: &mut TimerQueue) -> Vec<TimerKind> {
    std::iter::from_fn(|| q.pop_due().map(|(_, k)| k)).collect()
}

#[test]
fn one_shot_fires_once_at_deadline() {
    let mut q = TimerQueue::new();
    let h = q.after(TimerKind::EndScatter, 0.5);
    q.advance(0.4);
    assert!(drain(&mut q).is_empty());
    q.advance(0.1);
    assert_eq!(drain(&mut q), vec![TimerKind::EndScatter]);
    assert!(!q.is_pending(h));
    q.advance(10.0);
    assert!(drain(&mut q).is_empty());
}

#[test]
fn repeating_timer_catches_up_in_order() {
    let mut q = TimerQueue::new();
    q.every(TimerKind::ShuffleTick, 0.25);
    q.after(TimerKind::EndShuffle, 0.6);
    q.advance(1.0);
    assert_eq!(
        drain(&mut q),
        vec![
            TimerKind::ShuffleTick,
            TimerKind::ShuffleTick,
            TimerKind::EndShuffle,
            TimerKind::ShuffleTick,
            TimerKind::ShuffleTick,
        ]
    );
}

#[test]
fn cancelled_handles_never_fire() {
    let mut q = TimerQueue::new();
    let tick = q.every(TimerKind::ShuffleTick, 0.1);
    let end = q.after(TimerKind::EndShuffle, 0.1);
    q.advance(0.1);
    let (first, kind) = q.pop_due().unwrap();
    assert_eq!((first, kind), (tick, TimerKind::ShuffleTick));
    assert!(q.cancel(end));
    assert!(q.cancel(tick));
    assert!(q.pop_due().is_none());
    assert!(!q.cancel(end));
    assert!(q.is_empty());
}

#[test]
fn handles_are_unique() {
    let mut q = TimerQueue::new();
    let a = q.after(TimerKind::CloseSettled, 1.0);
    q.cancel(a);
    let b = q.after(TimerKind::CloseSettled, 1.0);
    assert_ne!(a, b);
}
