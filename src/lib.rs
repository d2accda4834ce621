//! Foldnote is the state and sequencing core of an animated greeting note.
//!
//! A session owns a scrolling poster wall, a bowl of notes, and one foldable paper note. The
//! crate never draws pixels: every tick it hands a [`FrameSnapshot`] to a [`FrameSink`] and
//! reads back which render targets the sink mounted.
//!
//! # Pieces
//!
//! - **Grid**: [`select`] maps `(row, slot)` onto an image pool deterministically,
//!   [`GridPlanner`] buckets viewport widths into breakpoint classes with a debounce, and
//!   [`PosterWall`] caches the resulting cells for the whole process.
//! - **Paper**: [`folded_pose`] / [`unfolded_pose`] give the two rest poses of the four
//!   quadrants plus the right-hand pivot group; [`FoldSequencer`] drives the two-stage
//!   unfold and its faster reverse.
//! - **Text**: [`TextRevealCoordinator`] holds the visible pass back until the paper is open,
//!   a layout for the live message exists, and every glyph target has mounted.
//! - **Bowl**: [`BowlController`] runs shuffle, select, open and close on owned timers, and
//!   never repeats a note before every note has been picked once.
//! - **Session**: [`GreetingSession`] ties it together behind `open_note`, `close_note`,
//!   `shuffle` and `is_busy`, with a fault boundary and `reload`.
#![forbid(unsafe_code)]

mod animation;
mod bowl;
mod config;
mod foundation;
mod grid;
mod paper;
mod session;
mod text;

pub use animation::ease::Ease;
pub use animation::timeline::{Direction, Lerp, Position, Timeline, Tween};
pub use bowl::controller::{
    BowlController, BowlEvent, BowlPhase, NoteId, NotePlacement, ShuffleTiming,
};
pub use bowl::timer::{TimerHandle, TimerKind, TimerQueue};
pub use config::{GreetingConfig, GridConfig, TextStyle};
pub use foundation::core::{Vec2, Vec3, Viewport};
pub use foundation::error::{FoldError, FoldResult};
pub use foundation::rng::Rng64;
pub use grid::existence::{ImageProbe, filter_existing, image_exists};
pub use grid::planner::{
    Breakpoint, BreakpointClass, BreakpointTable, GridPlan, GridPlanner, RowConfig,
    ScrollDirection, plan, plan_for,
};
pub use grid::posters::{PosterCell, PosterRow, PosterWall, build_rows, poster_id};
pub use grid::selector::{ImageSelector, PLACEHOLDER_POSTERS, select, select_index};
pub use paper::segment::{
    LAYER_GAP, PaperDims, PaperPose, PoseStore, SegmentId, SegmentPose, folded_pose,
    unfolded_pose,
};
pub use paper::sequencer::{FoldEvent, FoldSequencer, FoldTiming, MountState, SequencerState};
pub use session::greeting::{GreetingSession, OpenState, SessionEvent};
pub use session::sink::{
    FrameSink, FrameSnapshot, GridFrame, PaperFrame, RecordingSink, RenderReport, RowFrame,
    SegmentFrame,
};
pub use text::layout::{
    FixedAdvanceMeasurer, GlyphLayout, GlyphRecord, ParleyMeasurer, TextMeasurer,
};
pub use text::reveal::{
    GlyphFrame, GlyphVisual, MeasureTicket, RevealPhase, RevealTiming, RevealUnit,
    TextRevealCoordinator,
};
