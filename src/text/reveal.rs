//! Deferred, staggered character reveal.
//!
//! Measurement runs as an invisible pass and yields a [`GlyphLayout`]. The animated pass starts
//! only when three things hold at once: text is visible, the accepted layout spells the live
//! message, and every glyph target of that layout has registered with the latch.

use crate::{
    animation::ease::Ease,
    animation::timeline::Lerp,
    foundation::core::Vec2,
    foundation::error::{FoldError, FoldResult},
    text::layout::{GlyphLayout, GlyphRecord, TextMeasurer},
};

/// Animated properties of one glyph target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphVisual {
    pub opacity: f64,
    pub scale: f64,
    pub offset: Vec2,
    pub rotation_rad: f64,
}

impl GlyphVisual {
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        offset: Vec2::ZERO,
        rotation_rad: 0.0,
    };
}

impl Lerp for GlyphVisual {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            // Overshooting eases would push opacity past 1 otherwise.
            opacity: f64::lerp(&a.opacity, &b.opacity, t).clamp(0.0, 1.0),
            scale: f64::lerp(&a.scale, &b.scale, t),
            offset: <Vec2 as Lerp>::lerp(&a.offset, &b.offset, t),
            rotation_rad: f64::lerp(&a.rotation_rad, &b.rotation_rad, t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealUnit {
    Glyph,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    pub unit: RevealUnit,
    pub stagger_secs: f64,
    pub glyph_secs: f64,
    pub initial: GlyphVisual,
    pub ease: Ease,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            unit: RevealUnit::Glyph,
            stagger_secs: 0.06,
            glyph_secs: 0.6,
            initial: GlyphVisual {
                opacity: 0.0,
                scale: 0.5,
                offset: Vec2::new(0.0, 10.0),
                rotation_rad: 8f64.to_radians(),
            },
            ease: Ease::BackOut,
        }
    }
}

impl RevealTiming {
    pub fn validate(&self) -> FoldResult<()> {
        if !self.stagger_secs.is_finite() || self.stagger_secs < 0.0 {
            return Err(FoldError::validation(
                "reveal stagger_secs must be finite and >= 0",
            ));
        }
        if !self.glyph_secs.is_finite() || self.glyph_secs <= 0.0 {
            return Err(FoldError::validation(
                "reveal glyph_secs must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.initial.opacity) {
            return Err(FoldError::validation(
                "reveal initial opacity must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Proof that a measurement was started for a specific message generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealPhase {
    Idle,
    Measuring,
    AwaitingTargets,
    Hidden,
    Revealing,
    Revealed,
}

/// One glyph of the visible pass, as handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphFrame {
    pub index: usize,
    pub glyph: GlyphRecord,
    pub visual: GlyphVisual,
    pub registered: bool,
}

#[derive(Debug)]
pub struct TextRevealCoordinator {
    timing: RevealTiming,
    message: Option<String>,
    generation: u64,
    layout: Option<GlyphLayout>,
    measure_requested: bool,
    registered: Vec<bool>,
    registered_count: usize,
    text_visible: bool,
    reveal_elapsed: Option<f64>,
    visuals: Vec<GlyphVisual>,
}

impl TextRevealCoordinator {
    pub fn new(timing: RevealTiming) -> FoldResult<Self> {
        timing.validate()?;
        Ok(Self {
            timing,
            message: None,
            generation: 0,
            layout: None,
            measure_requested: false,
            registered: Vec::new(),
            registered_count: 0,
            text_visible: false,
            reveal_elapsed: None,
            visuals: Vec::new(),
        })
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> Option<&GlyphLayout> {
        self.layout.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.text_visible
    }

    pub fn needs_measurement(&self) -> bool {
        self.measure_requested
    }

    /// Switch to a new message. Anything in flight for the previous one becomes stale.
    pub fn set_message(&mut self, message: &str) {
        if self.message.as_deref() == Some(message) {
            return;
        }
        self.invalidate();
        self.message = Some(message.to_string());
        self.measure_requested = true;
        tracing::debug!(
            generation = self.generation,
            chars = message.chars().count(),
            "text message changed; measurement requested"
        );
    }

    pub fn clear(&mut self) {
        self.invalidate();
        self.message = None;
        self.measure_requested = false;
        self.text_visible = false;
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.layout = None;
        self.registered.clear();
        self.registered_count = 0;
        self.reveal_elapsed = None;
        self.visuals.clear();
    }

    /// Start the invisible measurement pass for the current message, if one is owed.
    pub fn begin_measurement(&mut self) -> Option<(MeasureTicket, String)> {
        if !self.measure_requested {
            return None;
        }
        let message = self.message.clone()?;
        self.measure_requested = false;
        Some((
            MeasureTicket {
                generation: self.generation,
            },
            message,
        ))
    }

    /// Hand back a measurement result. Returns whether the layout was accepted.
    ///
    /// Results for an older generation, or layouts that do not spell the live message, are
    /// dropped silently; the latter also re-requests measurement.
    pub fn finish_measurement(
        &mut self,
        ticket: MeasureTicket,
        result: FoldResult<GlyphLayout>,
    ) -> FoldResult<bool> {
        if ticket.generation != self.generation {
            tracing::trace!(
                stale = ticket.generation,
                current = self.generation,
                "discarding measurement for an old message"
            );
            return Ok(false);
        }
        let layout = match result {
            Ok(layout) => layout,
            Err(err) => {
                self.measure_requested = true;
                return Err(err);
            }
        };
        let Some(message) = self.message.as_deref() else {
            return Ok(false);
        };
        if !layout.matches(message) {
            tracing::trace!("measured layout does not spell the live message; remeasuring");
            self.measure_requested = true;
            return Ok(false);
        }

        let n = layout.len();
        self.registered = vec![false; n];
        self.registered_count = 0;
        self.visuals = vec![self.timing.initial; n];
        self.layout = Some(layout);
        self.maybe_start();
        Ok(true)
    }

    /// Run begin/measure/finish in one go.
    pub fn measure_pending<M: TextMeasurer + ?Sized>(
        &mut self,
        measurer: &mut M,
    ) -> FoldResult<bool> {
        let Some((ticket, message)) = self.begin_measurement() else {
            return Ok(false);
        };
        let result = measurer.measure(&message);
        self.finish_measurement(ticket, result)
    }

    /// A glyph render target attached. Indices outside the current layout are ignored.
    pub fn register_target(&mut self, index: usize) -> bool {
        let Some(slot) = self.registered.get_mut(index) else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
        self.registered_count += 1;
        self.maybe_start();
        true
    }

    pub fn registered_count(&self) -> usize {
        self.registered_count
    }

    pub fn expected_count(&self) -> usize {
        self.registered.len()
    }

    pub fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.text_visible = false;
            self.reveal_elapsed = None;
            for v in &mut self.visuals {
                v.opacity = 0.0;
            }
            return;
        }
        self.text_visible = true;
        self.maybe_start();
    }

    pub fn is_ready(&self) -> bool {
        self.text_visible
            && self.registered_count == self.registered.len()
            && match (&self.layout, &self.message) {
                (Some(layout), Some(message)) => layout.matches(message),
                _ => false,
            }
    }

    fn maybe_start(&mut self) {
        if self.reveal_elapsed.is_some() || !self.is_ready() {
            return;
        }
        tracing::debug!(glyphs = self.visuals.len(), "text reveal started");
        self.reveal_elapsed = Some(0.0);
        self.visuals.fill(self.timing.initial);
    }

    pub fn tick(&mut self, dt_secs: f64) {
        let Some(elapsed) = self.reveal_elapsed.as_mut() else {
            return;
        };
        if dt_secs.is_finite() && dt_secs > 0.0 {
            *elapsed += dt_secs;
        }
        let elapsed = *elapsed;
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        for (i, (glyph, visual)) in layout.glyphs.iter().zip(&mut self.visuals).enumerate() {
            let slot = match self.timing.unit {
                RevealUnit::Glyph => i,
                RevealUnit::Line => glyph.line,
            };
            *visual = visual_at(&self.timing, slot, elapsed);
        }
    }

    fn total_secs(&self) -> f64 {
        let Some(layout) = self.layout.as_ref() else {
            return 0.0;
        };
        let slots = match self.timing.unit {
            RevealUnit::Glyph => layout.len(),
            RevealUnit::Line => layout.line_count,
        };
        if slots == 0 {
            return 0.0;
        }
        (slots - 1) as f64 * self.timing.stagger_secs + self.timing.glyph_secs
    }

    pub fn phase(&self) -> RevealPhase {
        if self.message.is_none() {
            return RevealPhase::Idle;
        }
        if self.layout.is_none() {
            return RevealPhase::Measuring;
        }
        if self.registered_count < self.registered.len() {
            return RevealPhase::AwaitingTargets;
        }
        if !self.text_visible {
            return RevealPhase::Hidden;
        }
        match self.reveal_elapsed {
            Some(e) if e >= self.total_secs() => RevealPhase::Revealed,
            Some(_) => RevealPhase::Revealing,
            None => RevealPhase::AwaitingTargets,
        }
    }

    /// Glyphs of the visible pass. Empty until a layout for the live message is accepted and
    /// the text has been shown at least once.
    pub fn frames(&self) -> Vec<GlyphFrame> {
        let Some(layout) = self.layout.as_ref() else {
            return Vec::new();
        };
        if !self.text_visible && self.registered_count == 0 {
            return Vec::new();
        }
        layout
            .glyphs
            .iter()
            .zip(&self.visuals)
            .zip(&self.registered)
            .enumerate()
            .map(|(index, ((glyph, visual), registered))| GlyphFrame {
                index,
                glyph: *glyph,
                visual: *visual,
                registered: *registered,
            })
            .collect()
    }
}

fn visual_at(timing: &RevealTiming, slot: usize, elapsed: f64) -> GlyphVisual {
    let local = elapsed - slot as f64 * timing.stagger_secs;
    if local <= 0.0 {
        return timing.initial;
    }
    if local >= timing.glyph_secs {
        return GlyphVisual::SETTLED;
    }
    let t = timing.ease.apply(local / timing.glyph_secs);
    GlyphVisual::lerp(&timing.initial, &GlyphVisual::SETTLED, t)
}

#[cfg(test)]
#[path = "../../tests/unit/text/reveal.rs"]
mod tests;
