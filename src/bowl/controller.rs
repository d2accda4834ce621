use std::f64::consts::TAU;

use crate::{
    bowl::timer::{TimerHandle, TimerKind, TimerQueue},
    foundation::core::Vec2,
    foundation::error::{FoldError, FoldResult},
    foundation::rng::Rng64,
};

/// Index of a note in the bowl.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NoteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShuffleTiming {
    /// How long notes hold the circular scatter before shuffling.
    pub scatter_hold_secs: f64,
    /// Interval between random repositions.
    pub tick_secs: f64,
    /// Length of the randomized phase.
    pub shuffle_secs: f64,
    /// Delay after the paper folds shut before the bowl returns to idle.
    pub close_settle_secs: f64,
    pub bowl_radius: f64,
    pub seed: u64,
}

impl Default for ShuffleTiming {
    fn default() -> Self {
        Self {
            scatter_hold_secs: 0.6,
            tick_secs: 0.25,
            shuffle_secs: 2.0,
            close_settle_secs: 0.5,
            bowl_radius: 120.0,
            seed: 0x5eed_b0e1,
        }
    }
}

impl ShuffleTiming {
    pub fn validate(&self) -> FoldResult<()> {
        for (name, v) in [
            ("scatter_hold_secs", self.scatter_hold_secs),
            ("shuffle_secs", self.shuffle_secs),
            ("close_settle_secs", self.close_settle_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FoldError::validation(format!(
                    "shuffle {name} must be finite and >= 0"
                )));
            }
        }
        if !self.tick_secs.is_finite() || self.tick_secs <= 0.0 {
            return Err(FoldError::validation("shuffle tick_secs must be > 0"));
        }
        if !self.bowl_radius.is_finite() || self.bowl_radius <= 0.0 {
            return Err(FoldError::validation("bowl_radius must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BowlPhase {
    Idle,
    Scattering,
    Shuffling,
    Selected(NoteId),
    /// Paper is unfolding. `None` when the note was opened without a bowl pick.
    Opening(Option<NoteId>),
    Open(Option<NoteId>),
    Closing(Option<NoteId>),
    /// Paper is shut; waiting for the close settle delay.
    Settling,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NotePlacement {
    pub id: NoteId,
    pub position: Vec2,
    pub rotation_rad: f64,
    /// Lifted notes draw above the pile.
    pub lifted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BowlEvent {
    ShuffleStarted,
    Selected(NoteId),
    /// Back to the idle layout after a close.
    Settled,
}

/// Timers owned by one shuffle or close cycle.
#[derive(Clone, Debug, Default)]
struct Cycle {
    handles: Vec<TimerHandle>,
}

impl Cycle {
    fn owns(&self, handle: TimerHandle) -> bool {
        self.handles.contains(&handle)
    }
}

/// Drives shuffle, select, open and close for a bowl of notes.
///
/// Selection is fair: a note is not picked again until every other note has been picked once.
#[derive(Debug)]
pub struct BowlController {
    timing: ShuffleTiming,
    note_count: u32,
    unseen: Vec<NoteId>,
    rng: Rng64,
    phase: BowlPhase,
    placements: Vec<NotePlacement>,
    timers: TimerQueue,
    cycle: Cycle,
    cycles_completed: u32,
}

impl BowlController {
    pub fn new(note_count: u32, timing: ShuffleTiming) -> FoldResult<Self> {
        timing.validate()?;
        let mut out = Self {
            timing,
            note_count,
            unseen: Vec::new(),
            rng: Rng64::new(timing.seed),
            phase: BowlPhase::Idle,
            placements: Vec::new(),
            timers: TimerQueue::new(),
            cycle: Cycle::default(),
            cycles_completed: 0,
        };
        out.refill_unseen();
        out.placements = out.idle_layout();
        Ok(out)
    }

    pub fn phase(&self) -> BowlPhase {
        self.phase
    }

    pub fn note_count(&self) -> u32 {
        self.note_count
    }

    pub fn unseen_note_ids(&self) -> &[NoteId] {
        &self.unseen
    }

    /// Number of times the unseen pool ran dry and was refilled.
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn placements(&self) -> &[NotePlacement] {
        &self.placements
    }

    pub fn selected(&self) -> Option<NoteId> {
        match self.phase {
            BowlPhase::Selected(id) => Some(id),
            BowlPhase::Opening(id) | BowlPhase::Open(id) | BowlPhase::Closing(id) => id,
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            BowlPhase::Scattering
                | BowlPhase::Shuffling
                | BowlPhase::Opening(_)
                | BowlPhase::Closing(_)
                | BowlPhase::Settling
        )
    }

    /// Start a shuffle. Restarting mid-shuffle drops the old cycle's timers first.
    pub fn shuffle(&mut self) -> bool {
        if self.note_count == 0 {
            return false;
        }
        match self.phase {
            BowlPhase::Idle
            | BowlPhase::Selected(_)
            | BowlPhase::Scattering
            | BowlPhase::Shuffling => {}
            _ => return false,
        }
        self.cancel_cycle();
        self.phase = BowlPhase::Scattering;
        self.placements = self.scatter_layout();
        let h = self
            .timers
            .after(TimerKind::EndScatter, self.timing.scatter_hold_secs);
        self.cycle.handles.push(h);
        tracing::debug!(notes = self.note_count, "shuffle started");
        true
    }

    /// Tap a note. Only the selected note opens.
    pub fn tap(&mut self, id: NoteId) -> bool {
        if self.phase != BowlPhase::Selected(id) {
            return false;
        }
        self.begin_open(Some(id))
    }

    /// Enter the opening phase.
    ///
    /// Accepted from idle, from a selection, while settling, and while closing (which turns the
    /// close around).
    pub fn begin_open(&mut self, note: Option<NoteId>) -> bool {
        let note = match self.phase {
            BowlPhase::Idle | BowlPhase::Settling => note,
            BowlPhase::Selected(id) => note.or(Some(id)),
            BowlPhase::Closing(id) => id,
            _ => return false,
        };
        self.cancel_cycle();
        self.phase = BowlPhase::Opening(note);
        tracing::debug!(?note, "note opening");
        true
    }

    pub fn paper_opened(&mut self) {
        if let BowlPhase::Opening(id) = self.phase {
            self.phase = BowlPhase::Open(id);
        }
    }

    pub fn request_close(&mut self) -> bool {
        match self.phase {
            BowlPhase::Opening(id) | BowlPhase::Open(id) => {
                self.phase = BowlPhase::Closing(id);
                true
            }
            _ => false,
        }
    }

    /// Paper finished folding. Returns to idle after the settle delay.
    pub fn paper_closed(&mut self) {
        if !matches!(
            self.phase,
            BowlPhase::Closing(_) | BowlPhase::Opening(_) | BowlPhase::Open(_)
        ) {
            return;
        }
        self.cancel_cycle();
        self.phase = BowlPhase::Settling;
        let h = self
            .timers
            .after(TimerKind::CloseSettled, self.timing.close_settle_secs);
        self.cycle.handles.push(h);
    }

    /// Drop every pending timer and return to the idle layout.
    pub fn teardown(&mut self) {
        self.cancel_cycle();
        self.timers.clear();
        self.phase = BowlPhase::Idle;
        self.placements = self.idle_layout();
    }

    pub fn tick(&mut self, dt_secs: f64) -> Vec<BowlEvent> {
        self.timers.advance(dt_secs);
        let mut events = Vec::new();
        while let Some((handle, kind)) = self.timers.pop_due() {
            if !self.cycle.owns(handle) {
                tracing::trace!(?kind, "timer from a finished cycle ignored");
                self.timers.cancel(handle);
                continue;
            }
            if let Some(ev) = self.on_timer(kind) {
                events.push(ev);
            }
        }
        events
    }

    fn on_timer(&mut self, kind: TimerKind) -> Option<BowlEvent> {
        match (kind, self.phase) {
            (TimerKind::EndScatter, BowlPhase::Scattering) => {
                self.phase = BowlPhase::Shuffling;
                self.reposition();
                let tick = self.timers.every(TimerKind::ShuffleTick, self.timing.tick_secs);
                let end = self
                    .timers
                    .after(TimerKind::EndShuffle, self.timing.shuffle_secs);
                self.cycle.handles.extend([tick, end]);
                Some(BowlEvent::ShuffleStarted)
            }
            (TimerKind::ShuffleTick, BowlPhase::Shuffling) => {
                self.reposition();
                None
            }
            (TimerKind::EndShuffle, BowlPhase::Shuffling) => {
                self.cancel_cycle();
                let id = self.pick_unseen()?;
                self.phase = BowlPhase::Selected(id);
                self.lift(id);
                tracing::debug!(note = id.0, remaining = self.unseen.len(), "note selected");
                Some(BowlEvent::Selected(id))
            }
            (TimerKind::CloseSettled, BowlPhase::Settling) => {
                self.cancel_cycle();
                self.phase = BowlPhase::Idle;
                self.placements = self.idle_layout();
                Some(BowlEvent::Settled)
            }
            (kind, phase) => {
                tracing::trace!(?kind, ?phase, "timer does not match phase; ignored");
                None
            }
        }
    }

    fn cancel_cycle(&mut self) {
        for h in self.cycle.handles.drain(..) {
            self.timers.cancel(h);
        }
    }

    fn refill_unseen(&mut self) {
        self.unseen = (0..self.note_count).map(NoteId).collect();
    }

    fn pick_unseen(&mut self) -> Option<NoteId> {
        if self.unseen.is_empty() {
            if self.note_count == 0 {
                return None;
            }
            self.refill_unseen();
            self.cycles_completed += 1;
            tracing::debug!(cycle = self.cycles_completed, "every note seen; starting a new cycle");
        }
        let i = self.rng.next_below(self.unseen.len());
        Some(self.unseen.swap_remove(i))
    }

    fn idle_layout(&self) -> Vec<NotePlacement> {
        // Golden-angle spiral keeps the pile compact and stable.
        const GOLDEN: f64 = 2.399_963_229_728_653;
        let n = self.note_count.max(1) as f64;
        (0..self.note_count)
            .map(|i| {
                let r = self.timing.bowl_radius * 0.35 * ((i as f64 + 0.5) / n).sqrt();
                let a = i as f64 * GOLDEN;
                NotePlacement {
                    id: NoteId(i),
                    position: Vec2::new(r * a.cos(), r * a.sin()),
                    rotation_rad: (a % TAU) * 0.05,
                    lifted: false,
                }
            })
            .collect()
    }

    fn scatter_layout(&self) -> Vec<NotePlacement> {
        let n = self.note_count.max(1) as f64;
        let r = self.timing.bowl_radius * 0.8;
        (0..self.note_count)
            .map(|i| {
                let a = TAU * i as f64 / n;
                NotePlacement {
                    id: NoteId(i),
                    position: Vec2::new(r * a.cos(), r * a.sin()),
                    rotation_rad: a,
                    lifted: false,
                }
            })
            .collect()
    }

    fn reposition(&mut self) {
        let radius = self.timing.bowl_radius;
        for p in &mut self.placements {
            let r = radius * self.rng.next_f64_01().sqrt();
            let a = TAU * self.rng.next_f64_01();
            p.position = Vec2::new(r * a.cos(), r * a.sin());
            p.rotation_rad = self.rng.range(-0.4, 0.4);
            p.lifted = false;
        }
    }

    fn lift(&mut self, id: NoteId) {
        for p in &mut self.placements {
            p.lifted = p.id == id;
            if p.lifted {
                p.position = Vec2::ZERO;
                p.rotation_rad = 0.0;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bowl/controller.rs"]
mod tests;
