use std::path::Path;

use crate::{
    bowl::controller::ShuffleTiming,
    foundation::core::Viewport,
    foundation::error::{FoldError, FoldResult},
    grid::planner::{BreakpointTable, MIN_SETTLE_SECS},
    paper::segment::PaperDims,
    paper::sequencer::FoldTiming,
    text::layout::FixedAdvanceMeasurer,
    text::reveal::RevealTiming,
};

/// Font metrics for the measurement pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size_px: f64,
    pub line_height_px: f64,
    /// Wrap width. `None` keeps each paragraph on one line.
    pub max_line_width_px: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size_px: 28.0,
            line_height_px: 36.0,
            max_line_width_px: Some(420.0),
        }
    }
}

impl TextStyle {
    pub fn validate(&self) -> FoldResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(FoldError::validation("text font_size_px must be > 0"));
        }
        if !self.line_height_px.is_finite() || self.line_height_px <= 0.0 {
            return Err(FoldError::validation("text line_height_px must be > 0"));
        }
        if let Some(w) = self.max_line_width_px {
            if !w.is_finite() || w <= 0.0 {
                return Err(FoldError::validation("text max_line_width_px must be > 0"));
            }
        }
        Ok(())
    }

    /// Monospace-style measurer approximating this style (advance = 0.55 em).
    pub fn fixed_measurer(&self) -> FoldResult<FixedAdvanceMeasurer> {
        FixedAdvanceMeasurer::new(
            self.font_size_px * 0.55,
            self.line_height_px,
            self.max_line_width_px,
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Quiet period after the last resize before the grid is re-planned.
    pub settle_secs: f64,
    pub breakpoints: BreakpointTable,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            settle_secs: 0.15,
            breakpoints: BreakpointTable::default(),
        }
    }
}

/// Everything tunable about one greeting session.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub viewport: Viewport,
    pub paper: PaperDims,
    pub fold: FoldTiming,
    pub reveal: RevealTiming,
    pub text: TextStyle,
    pub shuffle: ShuffleTiming,
    pub grid: GridConfig,
}

impl GreetingConfig {
    pub fn from_json_str(s: &str) -> FoldResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> FoldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FoldError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> FoldResult<()> {
        self.viewport.validate()?;
        self.paper.validate()?;
        self.fold.validate()?;
        self.reveal.validate()?;
        self.text.validate()?;
        self.shuffle.validate()?;
        if !self.grid.settle_secs.is_finite() || self.grid.settle_secs < MIN_SETTLE_SECS {
            return Err(FoldError::validation(format!(
                "grid settle_secs must be >= {MIN_SETTLE_SECS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
