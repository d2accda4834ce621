use crate::{
    animation::ease::Ease,
    foundation::core::{Vec2, Vec3},
    foundation::error::{FoldError, FoldResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

/// Playhead direction. Forward unfolds, reverse folds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Where a tween is placed when added to a [`Timeline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Absolute start time in seconds.
    At(f64),
    /// Relative to the current end of the timeline; negative values overlap the tail.
    AfterEnd(f64),
    /// Relative to the start of the most recently added tween.
    WithPrevious(f64),
}

/// One property track: `target` goes from `from` to `to` over `duration_secs`.
#[derive(Clone, Debug)]
pub struct Tween<K, V> {
    pub target: K,
    pub from: V,
    pub to: V,
    pub duration_secs: f64,
    pub ease: Ease,
}

impl<K, V> Tween<K, V>
where
    V: Lerp + Clone,
{
    // Endpoints return the stored values verbatim so a seek to either end is exact. The end test
    // compares against `start + duration`, the same sum `Timeline::duration_secs` maximizes.
    fn sample_at(&self, start_secs: f64, time_secs: f64) -> V {
        if time_secs <= start_secs {
            return self.from.clone();
        }
        if self.duration_secs <= 0.0 || time_secs >= start_secs + self.duration_secs {
            return self.to.clone();
        }
        let t = self.ease.apply((time_secs - start_secs) / self.duration_secs);
        V::lerp(&self.from, &self.to, t)
    }
}

#[derive(Clone, Debug)]
struct Placed<K, V> {
    tween: Tween<K, V>,
    start_secs: f64,
}

/// Ordered set of tweens sharing a single playhead.
///
/// The playhead only moves inside [`Timeline::advance`]; `play`/`reverse` just arm it. Every
/// target may own at most one tween, so sampling never has to arbitrate between tracks.
#[derive(Clone, Debug)]
pub struct Timeline<K, V> {
    tweens: Vec<Placed<K, V>>,
    time_secs: f64,
    direction: Direction,
    active: bool,
    reverse_scale: f64,
}

impl<K, V> Default for Timeline<K, V> {
    fn default() -> Self {
        Self {
            tweens: Vec::new(),
            time_secs: 0.0,
            direction: Direction::Forward,
            active: false,
            reverse_scale: 1.0,
        }
    }
}

impl<K, V> Timeline<K, V>
where
    K: Copy + PartialEq + std::fmt::Debug,
    V: Lerp + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate multiplier applied while playing in reverse.
    pub fn with_reverse_scale(mut self, scale: f64) -> FoldResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(FoldError::animation("reverse time scale must be > 0"));
        }
        self.reverse_scale = scale;
        Ok(self)
    }

    pub fn add(&mut self, tween: Tween<K, V>, position: Position) -> FoldResult<f64> {
        if !tween.duration_secs.is_finite() || tween.duration_secs < 0.0 {
            return Err(FoldError::animation(
                "tween duration must be finite and >= 0",
            ));
        }
        if self.tweens.iter().any(|p| p.tween.target == tween.target) {
            return Err(FoldError::animation(format!(
                "timeline already animates {:?}",
                tween.target
            )));
        }
        let start_secs = match position {
            Position::At(t) => t,
            Position::AfterEnd(delta) => self.duration_secs() + delta,
            Position::WithPrevious(delta) => {
                self.tweens.last().map(|p| p.start_secs).unwrap_or(0.0) + delta
            }
        };
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(FoldError::animation(format!(
                "tween for {:?} would start at {start_secs}s",
                tween.target
            )));
        }
        self.tweens.push(Placed { tween, start_secs });
        Ok(start_secs)
    }

    pub fn duration_secs(&self) -> f64 {
        self.tweens
            .iter()
            .map(|p| p.start_secs + p.tween.duration_secs)
            .fold(0.0, f64::max)
    }

    pub fn start_of(&self, target: K) -> Option<f64> {
        self.tweens
            .iter()
            .find(|p| p.tween.target == target)
            .map(|p| p.start_secs)
    }

    pub fn time_secs(&self) -> f64 {
        self.time_secs
    }

    pub fn progress(&self) -> f64 {
        let d = self.duration_secs();
        if d <= 0.0 { 1.0 } else { self.time_secs / d }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn at_start(&self) -> bool {
        self.time_secs <= 0.0
    }

    pub fn at_end(&self) -> bool {
        self.time_secs >= self.duration_secs()
    }

    pub fn seek_start(&mut self) {
        self.time_secs = 0.0;
        self.active = false;
    }

    pub fn seek_end(&mut self) {
        self.time_secs = self.duration_secs();
        self.active = false;
    }

    /// Arm forward playback. Returns whether the playhead has anywhere to go.
    pub fn play(&mut self) -> bool {
        self.direction = Direction::Forward;
        self.active = !self.at_end();
        self.active
    }

    /// Arm reverse playback. Returns whether the playhead has anywhere to go.
    pub fn reverse(&mut self) -> bool {
        self.direction = Direction::Reverse;
        self.active = !self.at_start();
        self.active
    }

    /// Move the playhead by `dt_secs` of wall time. Returns the direction that completed, if the
    /// playhead reached its boundary during this step.
    pub fn advance(&mut self, dt_secs: f64) -> Option<Direction> {
        if !self.active || !dt_secs.is_finite() || dt_secs <= 0.0 {
            return None;
        }
        match self.direction {
            Direction::Forward => {
                let end = self.duration_secs();
                self.time_secs = (self.time_secs + dt_secs).min(end);
                if self.time_secs >= end {
                    self.active = false;
                    return Some(Direction::Forward);
                }
            }
            Direction::Reverse => {
                self.time_secs = (self.time_secs - dt_secs * self.reverse_scale).max(0.0);
                if self.time_secs <= 0.0 {
                    self.active = false;
                    return Some(Direction::Reverse);
                }
            }
        }
        None
    }

    /// Current value of every track, in insertion order.
    pub fn sample(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.tweens.iter().map(|p| {
            (
                p.tween.target,
                p.tween.sample_at(p.start_secs, self.time_secs),
            )
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
