use crate::{
    bowl::controller::{BowlController, BowlEvent, NoteId},
    config::GreetingConfig,
    foundation::core::Viewport,
    foundation::error::{FoldError, FoldResult},
    grid::existence::{ImageProbe, filter_existing},
    grid::planner::{GridPlan, GridPlanner},
    grid::posters::PosterWall,
    paper::segment::SegmentId,
    paper::sequencer::{FoldEvent, FoldSequencer, MountState},
    session::sink::{
        FrameSink, FrameSnapshot, GridFrame, PaperFrame, RenderReport, RowFrame, SegmentFrame,
    },
    text::layout::TextMeasurer,
    text::reveal::TextRevealCoordinator,
};

/// Logical state of the note.
///
/// The paper is only dropped in `Closed`; every close request passes through `Animating` so the
/// fold always plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OpenState {
    Closed,
    Animating { target_open: bool },
    FullyOpen,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SessionEvent {
    ShuffleStarted,
    NoteSelected(NoteId),
    Opened,
    Closed,
    BowlSettled,
    GridChanged,
    Faulted(String),
}

/// One greeting page: poster wall, bowl, and the foldable note.
///
/// Single-threaded and tick-driven. Each [`GreetingSession::tick`] advances timers and
/// animations, presents one [`FrameSnapshot`] to the sink, feeds back what the render pass
/// mounted, and then runs any measurement pass that was waiting on that commit.
#[derive(Debug)]
pub struct GreetingSession<M> {
    config: GreetingConfig,
    measurer: M,
    notes: Vec<String>,
    viewport: Viewport,
    bowl: BowlController,
    grid: GridPlanner,
    wall: PosterWall,
    paper: Option<FoldSequencer>,
    open_state: OpenState,
    reveal: TextRevealCoordinator,
    clock_secs: f64,
    frame: u64,
    fault: Option<String>,
}

impl<M: TextMeasurer> GreetingSession<M> {
    /// Uses `pool` as given. Callers holding unverified references should go through
    /// [`GreetingSession::with_probe`] instead.
    pub fn new(
        config: GreetingConfig,
        measurer: M,
        pool: Vec<String>,
        notes: Vec<String>,
    ) -> FoldResult<Self> {
        config.validate()?;
        let note_count = u32::try_from(notes.len())
            .map_err(|_| FoldError::validation("too many notes for one bowl"))?;
        Ok(Self {
            viewport: config.viewport,
            bowl: BowlController::new(note_count, config.shuffle)?,
            grid: GridPlanner::new(
                config.viewport.width,
                config.grid.breakpoints.clone(),
                config.grid.settle_secs,
            )?,
            wall: PosterWall::new(pool),
            paper: None,
            open_state: OpenState::Closed,
            reveal: TextRevealCoordinator::new(config.reveal)?,
            clock_secs: 0.0,
            frame: 0,
            fault: None,
            config,
            measurer,
            notes,
        })
    }

    /// Like [`GreetingSession::new`], dropping pool entries the probe cannot find.
    pub fn with_probe(
        config: GreetingConfig,
        measurer: M,
        pool: Vec<String>,
        notes: Vec<String>,
        probe: &dyn ImageProbe,
    ) -> FoldResult<Self> {
        let existing = filter_existing(&pool, probe);
        if existing.len() < pool.len() {
            tracing::debug!(
                kept = existing.len(),
                dropped = pool.len() - existing.len(),
                "filtered poster pool"
            );
        }
        Self::new(config, measurer, existing, notes)
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    pub fn open_state(&self) -> OpenState {
        self.open_state
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn bowl(&self) -> &BowlController {
        &self.bowl
    }

    pub fn paper(&self) -> Option<&FoldSequencer> {
        self.paper.as_ref()
    }

    pub fn reveal(&self) -> &TextRevealCoordinator {
        &self.reveal
    }

    pub fn grid_plan(&self) -> &GridPlan {
        self.grid.current()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    pub fn is_busy(&self) -> bool {
        self.bowl.is_busy() || matches!(self.open_state, OpenState::Animating { .. })
    }

    /// Open a note showing `message`. Returns false when the request is refused (already open,
    /// bowl mid-shuffle, or faulted).
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn open_note(&mut self, message: &str) -> bool {
        if self.fault.is_some() {
            return false;
        }
        match self.open_state {
            OpenState::Closed => {
                let note = self.bowl.selected();
                if !self.bowl.begin_open(note) {
                    return false;
                }
                let state = MountState {
                    target_open: true,
                    transitioning: true,
                };
                match FoldSequencer::mount(self.config.paper, self.config.fold, state) {
                    Ok(paper) => self.paper = Some(paper),
                    Err(err) => {
                        self.enter_fault(&err);
                        return false;
                    }
                }
                self.reveal.set_message(message);
                self.reveal.set_visible(false);
                self.open_state = OpenState::Animating { target_open: true };
                true
            }
            OpenState::Animating { target_open: false } => {
                self.bowl.begin_open(None);
                self.reveal.set_message(message);
                if let Some(paper) = self.paper.as_mut() {
                    paper.set_target(true);
                }
                self.open_state = OpenState::Animating { target_open: true };
                true
            }
            OpenState::Animating { target_open: true } | OpenState::FullyOpen => false,
        }
    }

    /// Open the note the bowl just picked.
    pub fn open_selected(&mut self) -> bool {
        let Some(id) = self.bowl.selected() else {
            return false;
        };
        if self.bowl.is_busy() {
            return false;
        }
        let Some(message) = self.notes.get(id.0 as usize).cloned() else {
            return false;
        };
        self.open_note(&message)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub fn close_note(&mut self) -> bool {
        if self.fault.is_some() {
            return false;
        }
        match self.open_state {
            OpenState::FullyOpen | OpenState::Animating { target_open: true } => {
                self.reveal.set_visible(false);
                if let Some(paper) = self.paper.as_mut() {
                    paper.set_target(false);
                }
                self.bowl.request_close();
                self.open_state = OpenState::Animating { target_open: false };
                true
            }
            _ => false,
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub fn shuffle(&mut self) -> bool {
        if self.fault.is_some() || self.open_state != OpenState::Closed {
            return false;
        }
        self.bowl.shuffle()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        match Viewport::new(width, height) {
            Ok(vp) => {
                self.viewport = vp;
                self.grid.resize(vp.width);
            }
            Err(err) => tracing::warn!(%err, "ignoring invalid viewport"),
        }
    }

    /// Advance by `dt_secs` and present one frame.
    pub fn tick(&mut self, dt_secs: f64, sink: &mut dyn FrameSink) -> Vec<SessionEvent> {
        let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        self.frame += 1;
        self.clock_secs += dt;

        if self.fault.is_some() {
            let snap = self.snapshot();
            if let Err(err) = sink.present(&snap) {
                tracing::warn!(%err, "fallback frame failed to present");
            }
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.grid.tick(dt) {
            events.push(SessionEvent::GridChanged);
        }
        for ev in self.bowl.tick(dt) {
            events.push(match ev {
                BowlEvent::ShuffleStarted => SessionEvent::ShuffleStarted,
                BowlEvent::Selected(id) => SessionEvent::NoteSelected(id),
                BowlEvent::Settled => SessionEvent::BowlSettled,
            });
        }
        let paper_event = self.paper.as_mut().and_then(|p| p.tick(dt));
        match paper_event {
            Some(FoldEvent::Opened) => {
                self.open_state = OpenState::FullyOpen;
                self.reveal.set_visible(true);
                self.bowl.paper_opened();
                events.push(SessionEvent::Opened);
            }
            Some(FoldEvent::Closed) => {
                if let Some(mut paper) = self.paper.take() {
                    paper.unmount();
                }
                self.open_state = OpenState::Closed;
                self.reveal.clear();
                self.bowl.paper_closed();
                events.push(SessionEvent::Closed);
            }
            None => {}
        }
        self.reveal.tick(dt);

        let snap = self.snapshot();
        let report = match sink.present(&snap) {
            Ok(report) => report,
            Err(err) => {
                events.push(self.enter_fault(&err));
                return events;
            }
        };
        self.apply_report(report);

        if let Err(err) = self.reveal.measure_pending(&mut self.measurer) {
            events.push(self.enter_fault(&err));
        }
        events
    }

    /// Recover from a fault with a fresh session. Configuration, pool, notes and measurer carry
    /// over; everything else starts again.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn reload(&mut self) -> FoldResult<()> {
        let note_count = self.bowl.note_count();
        self.bowl = BowlController::new(note_count, self.config.shuffle)?;
        self.grid = GridPlanner::new(
            self.viewport.width,
            self.config.grid.breakpoints.clone(),
            self.config.grid.settle_secs,
        )?;
        self.reveal = TextRevealCoordinator::new(self.config.reveal)?;
        if let Some(mut paper) = self.paper.take() {
            paper.unmount();
        }
        self.open_state = OpenState::Closed;
        self.clock_secs = 0.0;
        self.fault = None;
        tracing::info!("session reloaded");
        Ok(())
    }

    pub fn snapshot(&mut self) -> FrameSnapshot {
        let plan = self.grid.current().clone();
        let posters = self.wall.rows(&plan);
        let t = self.clock_secs;
        let grid = GridFrame {
            class: plan.class,
            items_per_row: plan.items_per_row,
            rows: plan
                .rows
                .iter()
                .map(|r| RowFrame {
                    row: r.row,
                    direction: r.direction,
                    depth_offset: r.depth_offset,
                    scroll_offset: r.scroll_offset(t),
                })
                .collect(),
            posters,
        };

        if self.fault.is_some() {
            return FrameSnapshot {
                frame: self.frame,
                time_secs: t,
                viewport: self.viewport,
                open_state: OpenState::Closed,
                bowl_phase: self.bowl.phase(),
                notes: Vec::new(),
                grid,
                paper: None,
                text_phase: self.reveal.phase(),
                glyphs: Vec::new(),
                fault: self.fault.clone(),
            };
        }

        let paper = self.paper.as_ref().map(|p| PaperFrame {
            state: p.state(),
            progress: p.progress(),
            segments: SegmentId::ALL
                .into_iter()
                .filter_map(|id| p.poses().get(id).map(|pose| SegmentFrame { id, pose }))
                .collect(),
        });
        FrameSnapshot {
            frame: self.frame,
            time_secs: t,
            viewport: self.viewport,
            open_state: self.open_state,
            bowl_phase: self.bowl.phase(),
            notes: self.bowl.placements().to_vec(),
            grid,
            paper,
            text_phase: self.reveal.phase(),
            glyphs: self.reveal.frames(),
            fault: None,
        }
    }

    fn apply_report(&mut self, report: RenderReport) {
        if let Some(paper) = self.paper.as_mut() {
            for id in report.detached {
                paper.detach(id);
            }
            for id in report.attached {
                paper.attach(id);
            }
        }
        for index in report.glyph_targets {
            self.reveal.register_target(index);
        }
    }

    fn enter_fault(&mut self, err: &FoldError) -> SessionEvent {
        let message = err.to_string();
        tracing::error!(error = %message, "render pipeline fault; showing fallback");
        self.bowl.teardown();
        if let Some(mut paper) = self.paper.take() {
            paper.unmount();
        }
        self.reveal.clear();
        self.open_state = OpenState::Closed;
        self.fault = Some(message.clone());
        SessionEvent::Faulted(message)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/greeting.rs"]
mod tests;
