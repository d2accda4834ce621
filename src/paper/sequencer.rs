use crate::{
    animation::ease::Ease,
    animation::timeline::{Direction, Position, Timeline, Tween},
    foundation::error::{FoldError, FoldResult},
    paper::segment::{
        PaperDims, PaperPose, PoseStore, SegmentId, SegmentPose, folded_pose, unfolded_pose,
    },
};

/// Tunable fold choreography. Only the ordering between stages is a hard contract.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FoldTiming {
    /// Duration of each top-segment unfold.
    pub stage_one_secs: f64,
    /// Delay between the top-left and top-right unfold.
    pub top_stagger_secs: f64,
    /// How long before the end of stage 1 the pivot group starts moving.
    pub stage_two_lead_secs: f64,
    /// Stage 2 duration relative to stage 1.
    pub stage_two_factor: f64,
    /// Playback rate multiplier while folding.
    pub reverse_scale: f64,
}

impl Default for FoldTiming {
    fn default() -> Self {
        Self {
            stage_one_secs: 0.8,
            top_stagger_secs: 0.1,
            stage_two_lead_secs: 0.15,
            stage_two_factor: 1.2,
            reverse_scale: 1.5,
        }
    }
}

impl FoldTiming {
    pub fn validate(&self) -> FoldResult<()> {
        for (name, v) in [
            ("stage_one_secs", self.stage_one_secs),
            ("top_stagger_secs", self.top_stagger_secs),
            ("stage_two_lead_secs", self.stage_two_lead_secs),
            ("stage_two_factor", self.stage_two_factor),
            ("reverse_scale", self.reverse_scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FoldError::validation(format!(
                    "fold {name} must be finite and >= 0"
                )));
            }
        }
        if self.stage_one_secs <= 0.0 {
            return Err(FoldError::validation("fold stage_one_secs must be > 0"));
        }
        if self.stage_two_factor <= 0.0 || self.reverse_scale <= 0.0 {
            return Err(FoldError::validation(
                "fold stage_two_factor and reverse_scale must be > 0",
            ));
        }
        if self.stage_two_lead_secs >= self.stage_one_secs {
            return Err(FoldError::validation(
                "fold stage_two_lead_secs must be shorter than stage_one_secs",
            ));
        }
        Ok(())
    }
}

/// Target state known when a paper instance is mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountState {
    pub target_open: bool,
    /// The open/close transition is still in flight at mount time.
    pub transitioning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SequencerState {
    NotBuilt,
    BuiltFolded,
    BuiltUnfolded,
    AnimatingForward,
    AnimatingReverse,
}

/// Completion of a direction that still matches the latest requested target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FoldEvent {
    Opened,
    Closed,
}

/// Drives the four segments and the pivot group through the two-stage fold timeline.
///
/// The timeline is built at most once per instance, on the first dependency change where all
/// five nodes are attached. Dropping the instance (or [`FoldSequencer::unmount`]) disposes it.
#[derive(Debug)]
pub struct FoldSequencer {
    dims: PaperDims,
    timing: FoldTiming,
    store: PoseStore,
    timeline: Option<Timeline<SegmentId, SegmentPose>>,
    rest: PaperPose,
    target_open: bool,
    settled_open: bool,
    pending: Option<FoldEvent>,
    /// A target change arrived after mount.
    requested: bool,
    builds: u32,
    disposed: bool,
}

impl FoldSequencer {
    pub fn mount(dims: PaperDims, timing: FoldTiming, state: MountState) -> FoldResult<Self> {
        dims.validate()?;
        timing.validate()?;
        Ok(Self {
            dims,
            timing,
            store: PoseStore::default(),
            timeline: None,
            rest: unfolded_pose(dims),
            target_open: state.target_open,
            settled_open: state.target_open && !state.transitioning,
            pending: None,
            requested: false,
            builds: 0,
            disposed: false,
        })
    }

    pub fn state(&self) -> SequencerState {
        let Some(tl) = self.timeline.as_ref() else {
            return SequencerState::NotBuilt;
        };
        match (tl.is_active(), tl.direction()) {
            (true, Direction::Forward) => SequencerState::AnimatingForward,
            (true, Direction::Reverse) => SequencerState::AnimatingReverse,
            (false, _) if tl.at_end() => SequencerState::BuiltUnfolded,
            (false, _) => SequencerState::BuiltFolded,
        }
    }

    pub fn target_open(&self) -> bool {
        self.target_open
    }

    pub fn is_running(&self) -> bool {
        self.timeline.as_ref().is_some_and(Timeline::is_active)
    }

    pub fn build_count(&self) -> u32 {
        self.builds
    }

    pub fn progress(&self) -> Option<f64> {
        self.timeline.as_ref().map(Timeline::progress)
    }

    pub fn poses(&self) -> &PoseStore {
        &self.store
    }

    pub fn pose(&self) -> Option<PaperPose> {
        self.store.pose()
    }

    /// Start time of a node's tween, for ordering checks and debugging.
    pub fn stage_start(&self, id: SegmentId) -> Option<f64> {
        self.timeline.as_ref().and_then(|tl| tl.start_of(id))
    }

    pub fn attach(&mut self, id: SegmentId) {
        if self.disposed || !self.store.attach(id) {
            return;
        }
        if self.timeline.is_some() {
            self.sync_poses();
        } else {
            self.try_build();
        }
    }

    /// Render pass unmounted a node. The timeline survives; the node is re-posed on re-attach.
    pub fn detach(&mut self, id: SegmentId) {
        self.store.detach(id);
    }

    pub fn set_target(&mut self, open: bool) {
        if self.disposed || open == self.target_open {
            return;
        }
        self.target_open = open;
        self.settled_open = false;
        self.requested = true;
        self.pending = None;
        if self.timeline.is_none() {
            self.try_build();
            return;
        }
        self.apply_direction();
    }

    /// Advance the playhead and report at most one relevant completion.
    pub fn tick(&mut self, dt_secs: f64) -> Option<FoldEvent> {
        if self.disposed {
            return None;
        }
        if self.timeline.is_none() {
            self.try_build();
        }
        if let Some(ev) = self.pending.take() {
            return Some(ev);
        }
        let done = self.timeline.as_mut()?.advance(dt_secs);
        self.sync_poses();
        let dir = done?;
        match (dir, self.target_open) {
            (Direction::Forward, true) => {
                tracing::debug!("paper fully unfolded");
                Some(FoldEvent::Opened)
            }
            (Direction::Reverse, false) => {
                tracing::debug!("paper fully folded");
                Some(FoldEvent::Closed)
            }
            _ => {
                tracing::trace!(?dir, target_open = self.target_open, "stale completion ignored");
                self.apply_direction();
                self.pending.take()
            }
        }
    }

    pub fn unmount(&mut self) {
        self.disposed = true;
        self.timeline = None;
        self.pending = None;
    }

    fn try_build(&mut self) {
        if self.disposed || self.timeline.is_some() {
            return;
        }
        if !self.store.is_complete() {
            tracing::trace!("paper nodes not attached yet; build deferred");
            return;
        }
        let mut tl = match self.build_timeline() {
            Ok(tl) => tl,
            Err(err) => {
                // Timing was validated at mount, so this only trips on a logic error.
                tracing::warn!(%err, "fold timeline build failed");
                return;
            }
        };
        self.builds += 1;
        let settled = self.settled_open;
        if settled {
            tl.seek_end();
        } else {
            tl.seek_start();
        }
        tracing::debug!(
            target_open = self.target_open,
            seek_end = settled,
            duration_secs = tl.duration_secs(),
            "fold timeline built"
        );
        self.timeline = Some(tl);
        self.sync_poses();
        // Mounted closed and never asked to move: already at rest.
        if !settled && (self.target_open || self.requested) {
            self.apply_direction();
        }
    }

    fn build_timeline(&self) -> FoldResult<Timeline<SegmentId, SegmentPose>> {
        let folded = folded_pose(self.dims);
        let flat = self.rest;
        let t = self.timing;
        let tween = |id: SegmentId, duration_secs: f64| Tween {
            target: id,
            from: folded.get(id),
            to: flat.get(id),
            duration_secs,
            ease: Ease::InOutCubic,
        };

        let mut tl = Timeline::new().with_reverse_scale(t.reverse_scale)?;
        tl.add(tween(SegmentId::TopLeft, t.stage_one_secs), Position::At(0.0))?;
        tl.add(
            tween(SegmentId::TopRight, t.stage_one_secs),
            Position::WithPrevious(t.top_stagger_secs),
        )?;
        tl.add(
            tween(
                SegmentId::RightPivot,
                t.stage_one_secs * t.stage_two_factor,
            ),
            Position::AfterEnd(-t.stage_two_lead_secs),
        )?;
        Ok(tl)
    }

    fn apply_direction(&mut self) {
        let target_open = self.target_open;
        let Some(tl) = self.timeline.as_mut() else {
            return;
        };
        if tl.is_active() {
            tracing::trace!(target_open, "timeline running; direction change deferred");
            return;
        }
        let started = if target_open { tl.play() } else { tl.reverse() };
        if !started {
            // Already resting at the requested end.
            self.pending = Some(if target_open {
                FoldEvent::Opened
            } else {
                FoldEvent::Closed
            });
        }
    }

    fn sync_poses(&mut self) {
        for (id, pose) in self.rest.iter() {
            if !id.rotates() {
                self.store.write(id, pose);
            }
        }
        if let Some(tl) = self.timeline.as_ref() {
            for (id, pose) in tl.sample() {
                self.store.write(id, pose);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paper/sequencer.rs"]
mod tests;
