/// Owned handle to one scheduled callback. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimerKind {
    /// Circular scatter hold is over.
    EndScatter,
    /// Repeating reposition during the shuffle.
    ShuffleTick,
    /// Shuffle is over; pick a note.
    EndShuffle,
    /// Close animation has had time to settle.
    CloseSettled,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    handle: TimerHandle,
    kind: TimerKind,
    deadline: f64,
    interval: Option<f64>,
}

/// Tick-driven timer queue on a virtual clock.
///
/// Time only moves through [`TimerQueue::advance`]. Due timers are drained one at a time with
/// [`TimerQueue::pop_due`], so a callback that cancels other handles takes effect before those
/// handles can fire.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shortest repeat interval accepted; keeps a repeating timer from spinning inside one advance.
pub const MIN_INTERVAL_SECS: f64 = 1e-3;

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-shot timer firing `delay_secs` from now.
    pub fn after(&mut self, kind: TimerKind, delay_secs: f64) -> TimerHandle {
        self.push(kind, delay_secs.max(0.0), None)
    }

    /// Repeating timer; first fire one interval from now.
    pub fn every(&mut self, kind: TimerKind, interval_secs: f64) -> TimerHandle {
        let interval = interval_secs.max(MIN_INTERVAL_SECS);
        self.push(kind, interval, Some(interval))
    }

    fn push(&mut self, kind: TimerKind, delay: f64, interval: Option<f64>) -> TimerHandle {
        let handle = TimerHandle { id: self.next_id };
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            kind,
            deadline: self.now + delay,
            interval,
        });
        handle
    }

    /// Returns false when the handle already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn advance(&mut self, dt_secs: f64) {
        if dt_secs.is_finite() && dt_secs > 0.0 {
            self.now += dt_secs;
        }
    }

    /// Earliest due timer, ties broken by scheduling order.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, TimerKind)> {
        let now = self.now;
        let (i, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.handle.id.cmp(&b.handle.id))
            })?;
        let entry = self.entries[i];
        match entry.interval {
            Some(interval) => self.entries[i].deadline += interval,
            None => {
                self.entries.remove(i);
            }
        }
        Some((entry.handle, entry.kind))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bowl/timer.rs"]
mod tests;
