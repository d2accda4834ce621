use std::{collections::HashMap, sync::Arc};

use crate::foundation::error::{FoldError, FoldResult};

/// Discrete viewport-width bucket.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum BreakpointClass {
    VerySmall,
    Small,
    Tablet,
    Desktop,
    Wide,
}

/// One row of the breakpoint table. Widths below `max_width` (exclusive) fall into this class;
/// the last entry has no upper bound.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Breakpoint {
    pub class: BreakpointClass,
    pub max_width: Option<f64>,
    pub row_count: usize,
    pub items_per_row: usize,
}

/// Validated breakpoint table: strictly increasing bounded entries plus one unbounded entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    bounded: Vec<Breakpoint>,
    widest: Breakpoint,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        let bp = |class, max_width, row_count, items_per_row| Breakpoint {
            class,
            max_width,
            row_count,
            items_per_row,
        };
        Self {
            bounded: vec![
                bp(BreakpointClass::VerySmall, Some(480.0), 3, 4),
                bp(BreakpointClass::Small, Some(768.0), 4, 5),
                bp(BreakpointClass::Tablet, Some(1024.0), 5, 6),
                bp(BreakpointClass::Desktop, Some(1440.0), 6, 8),
            ],
            widest: bp(BreakpointClass::Wide, None, 7, 10),
        }
    }
}

impl TryFrom<Vec<Breakpoint>> for BreakpointTable {
    type Error = FoldError;

    fn try_from(mut entries: Vec<Breakpoint>) -> FoldResult<Self> {
        let Some(widest) = entries.pop() else {
            return Err(FoldError::validation("breakpoint table must not be empty"));
        };
        if widest.max_width.is_some() {
            return Err(FoldError::validation(
                "last breakpoint must have no max_width",
            ));
        }
        let mut prev = 0.0;
        for bp in &entries {
            let Some(w) = bp.max_width else {
                return Err(FoldError::validation(
                    "only the last breakpoint may omit max_width",
                ));
            };
            if !w.is_finite() || w <= prev {
                return Err(FoldError::validation(
                    "breakpoint max_width values must be finite and strictly increasing",
                ));
            }
            prev = w;
        }
        if entries
            .iter()
            .chain(std::iter::once(&widest))
            .any(|bp| bp.row_count == 0 || bp.items_per_row == 0)
        {
            return Err(FoldError::validation(
                "breakpoint row_count and items_per_row must be > 0",
            ));
        }
        let mut seen = Vec::with_capacity(entries.len() + 1);
        for bp in entries.iter().chain(std::iter::once(&widest)) {
            if seen.contains(&bp.class) {
                return Err(FoldError::validation(format!(
                    "breakpoint class {:?} listed more than once",
                    bp.class
                )));
            }
            seen.push(bp.class);
        }
        Ok(Self {
            bounded: entries,
            widest,
        })
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        let mut out = table.bounded;
        out.push(table.widest);
        out
    }
}

impl BreakpointTable {
    pub fn new(entries: Vec<Breakpoint>) -> FoldResult<Self> {
        Self::try_from(entries)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Breakpoint> {
        self.bounded.iter().chain(std::iter::once(&self.widest))
    }

    /// Entry for a width. Non-finite or negative widths classify as the smallest bucket.
    pub fn classify(&self, width: f64) -> &Breakpoint {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.bounded
            .iter()
            .find(|bp| bp.max_width.is_some_and(|max| width < max))
            .unwrap_or(&self.widest)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Depth step between consecutive rows of the perspective wall.
pub const ROW_DEPTH_STEP: f64 = 40.0;
/// Scroll speed of row 0, in poster pitches per second.
pub const BASE_ROW_SPEED: f64 = 0.08;
/// Extra posters per row beyond the visible count so wrapping never exposes a gap.
pub const ROW_OVERSCAN: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RowConfig {
    pub row: usize,
    pub direction: ScrollDirection,
    pub poster_count: usize,
    pub depth_offset: f64,
    /// Poster pitches per second.
    pub speed: f64,
}

impl RowConfig {
    /// Horizontal scroll offset after `t_secs`, in pitches, wrapped into `[0, poster_count)`
    /// and signed by direction.
    pub fn scroll_offset(&self, t_secs: f64) -> f64 {
        let len = self.poster_count as f64;
        if len <= 0.0 || !t_secs.is_finite() {
            return 0.0;
        }
        let travelled = (self.speed * t_secs).rem_euclid(len);
        match self.direction {
            ScrollDirection::Left => -travelled,
            ScrollDirection::Right => travelled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridPlan {
    pub class: BreakpointClass,
    pub row_count: usize,
    pub items_per_row: usize,
    pub rows: Vec<RowConfig>,
}

/// Pure plan for one breakpoint entry.
pub fn plan_for(bp: &Breakpoint) -> GridPlan {
    let rows = (0..bp.row_count)
        .map(|row| RowConfig {
            row,
            direction: if row % 2 == 0 {
                ScrollDirection::Left
            } else {
                ScrollDirection::Right
            },
            poster_count: bp.items_per_row + ROW_OVERSCAN,
            depth_offset: -(row as f64) * ROW_DEPTH_STEP,
            speed: BASE_ROW_SPEED * (1.0 + 0.15 * (row % 3) as f64),
        })
        .collect();
    GridPlan {
        class: bp.class,
        row_count: bp.row_count,
        items_per_row: bp.items_per_row,
        rows,
    }
}

/// Pure plan for a width.
pub fn plan(width: f64, table: &BreakpointTable) -> GridPlan {
    plan_for(table.classify(width))
}

/// Debounced, class-cached grid planning.
///
/// Resize events only record the latest width. The plan is re-evaluated once the viewport has
/// been quiet for the settle window, and only swapped when the breakpoint class changes.
#[derive(Debug)]
pub struct GridPlanner {
    table: BreakpointTable,
    settle_secs: f64,
    cache: HashMap<BreakpointClass, Arc<GridPlan>>,
    current: Arc<GridPlan>,
    pending_width: Option<f64>,
    quiet_secs: f64,
    computations: u32,
}

/// Minimum accepted settle window.
pub const MIN_SETTLE_SECS: f64 = 0.1;

impl GridPlanner {
    pub fn new(width: f64, table: BreakpointTable, settle_secs: f64) -> FoldResult<Self> {
        if !settle_secs.is_finite() || settle_secs < MIN_SETTLE_SECS {
            return Err(FoldError::validation(format!(
                "grid settle window must be >= {MIN_SETTLE_SECS}s"
            )));
        }
        let current = Arc::new(plan(width, &table));
        let mut cache = HashMap::new();
        cache.insert(current.class, current.clone());
        Ok(Self {
            table,
            settle_secs,
            cache,
            current,
            pending_width: None,
            quiet_secs: 0.0,
            computations: 1,
        })
    }

    pub fn current(&self) -> &Arc<GridPlan> {
        &self.current
    }

    /// Number of plans computed (cache misses) since creation.
    pub fn computations(&self) -> u32 {
        self.computations
    }

    pub fn is_settling(&self) -> bool {
        self.pending_width.is_some()
    }

    pub fn resize(&mut self, width: f64) {
        self.pending_width = Some(width);
        self.quiet_secs = 0.0;
    }

    /// Advance the settle timer. Returns `true` when the active plan changed.
    pub fn tick(&mut self, dt_secs: f64) -> bool {
        let Some(width) = self.pending_width else {
            return false;
        };
        if dt_secs.is_finite() && dt_secs > 0.0 {
            self.quiet_secs += dt_secs;
        }
        if self.quiet_secs < self.settle_secs {
            return false;
        }
        self.pending_width = None;
        self.quiet_secs = 0.0;
        self.settle(width)
    }

    fn settle(&mut self, width: f64) -> bool {
        let bp = *self.table.classify(width);
        if bp.class == self.current.class {
            tracing::trace!(width, class = ?bp.class, "resize stayed in breakpoint class");
            return false;
        }
        let next = match self.cache.get(&bp.class) {
            Some(hit) => hit.clone(),
            None => {
                self.computations += 1;
                tracing::debug!(width, class = ?bp.class, "computing grid plan");
                let fresh = Arc::new(plan_for(&bp));
                self.cache.insert(bp.class, fresh.clone());
                fresh
            }
        };
        self.current = next;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/planner.rs"]
mod tests;
