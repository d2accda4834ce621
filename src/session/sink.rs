use std::sync::Arc;

use crate::{
    bowl::controller::{BowlPhase, NotePlacement},
    foundation::core::Viewport,
    foundation::error::FoldResult,
    grid::planner::{BreakpointClass, ScrollDirection},
    grid::posters::PosterRow,
    paper::segment::{SegmentId, SegmentPose},
    paper::sequencer::SequencerState,
    session::greeting::OpenState,
    text::reveal::{GlyphFrame, RevealPhase},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RowFrame {
    pub row: usize,
    pub direction: ScrollDirection,
    pub depth_offset: f64,
    /// Signed scroll offset in poster pitches.
    pub scroll_offset: f64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct GridFrame {
    pub class: BreakpointClass,
    pub items_per_row: usize,
    pub rows: Vec<RowFrame>,
    #[serde(skip)]
    pub posters: Arc<Vec<PosterRow>>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SegmentFrame {
    pub id: SegmentId,
    pub pose: SegmentPose,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PaperFrame {
    pub state: SequencerState,
    pub progress: Option<f64>,
    /// Poses of attached nodes only.
    pub segments: Vec<SegmentFrame>,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub time_secs: f64,
    pub viewport: Viewport,
    pub open_state: OpenState,
    pub bowl_phase: BowlPhase,
    pub notes: Vec<NotePlacement>,
    pub grid: GridFrame,
    pub paper: Option<PaperFrame>,
    pub text_phase: RevealPhase,
    pub glyphs: Vec<GlyphFrame>,
    /// Set once the session has faulted; the renderer shows a fallback instead.
    pub fault: Option<String>,
}

/// What the render pass committed while presenting a frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub attached: Vec<SegmentId>,
    pub detached: Vec<SegmentId>,
    /// Glyph indices whose render targets now exist.
    pub glyph_targets: Vec<usize>,
}

/// Render boundary.
///
/// Called once per session tick, in frame order. An error is treated as a render pipeline
/// fault and stops the session until it is reloaded.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameSnapshot) -> FoldResult<RenderReport>;
}

/// In-memory sink for tests and the CLI. Mounts every node it is shown.
#[derive(Debug)]
pub struct RecordingSink {
    frames: Vec<FrameSnapshot>,
    mount_paper: bool,
    mount_glyphs: bool,
    keep: usize,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            mount_paper: true,
            mount_glyphs: true,
            keep: usize::MAX,
        }
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `n` frames.
    pub fn with_capacity_limit(mut self, n: usize) -> Self {
        self.keep = n.max(1);
        self
    }

    /// Stop (or resume) reporting paper nodes as attached.
    pub fn mount_paper(&mut self, on: bool) {
        self.mount_paper = on;
    }

    /// Stop (or resume) reporting glyph targets.
    pub fn mount_glyphs(&mut self, on: bool) {
        self.mount_glyphs = on;
    }

    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl FrameSink for RecordingSink {
    fn present(&mut self, frame: &FrameSnapshot) -> FoldResult<RenderReport> {
        if self.frames.len() >= self.keep {
            let excess = self.frames.len() + 1 - self.keep;
            self.frames.drain(..excess);
        }
        self.frames.push(frame.clone());

        let mut report = RenderReport::default();
        if let Some(paper) = frame.paper.as_ref() {
            if self.mount_paper {
                report.attached = SegmentId::ALL
                    .into_iter()
                    .filter(|id| !paper.segments.iter().any(|s| s.id == *id))
                    .collect();
            } else {
                report.detached = paper.segments.iter().map(|s| s.id).collect();
            }
        }
        if self.mount_glyphs {
            report.glyph_targets = frame
                .glyphs
                .iter()
                .filter(|g| !g.registered)
                .map(|g| g.index)
                .collect();
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sink.rs"]
mod tests;
