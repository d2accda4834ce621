use crate::foundation::error::{FoldError, FoldResult};

pub use kurbo::Vec2;

/// Three-component vector used for segment positions and Euler rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Largest per-component absolute difference.
    pub fn max_abs_diff(self, other: Self) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }
}

/// Viewport size in device-independent pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Validate and build a viewport.
    pub fn new(width: f64, height: f64) -> FoldResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    pub fn validate(&self) -> FoldResult<()> {
        if !self.width.is_finite()
            || self.width < 0.0
            || !self.height.is_finite()
            || self.height < 0.0
        {
            return Err(FoldError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
