//! Four-quadrant foldable surface.
//!
//! The left pair (top-left, bottom-left) hangs directly off the paper root. The right pair
//! (top-right, bottom-right) hangs off the right pivot group, whose hinge runs along the vertical
//! center line. Top segments are anchored on the horizontal center line, so their position stays
//! fixed and folding is a pure rotation around that hinge; their geometry sits
//! [`SegmentId::geometry_offset`] above the anchor.

use std::f64::consts::PI;

use crate::{
    animation::timeline::Lerp,
    foundation::core::Vec3,
    foundation::error::{FoldError, FoldResult},
};

/// Depth separation between stacked layers when folded, in surface units.
pub const LAYER_GAP: f64 = 0.002;

/// Poseable node of the paper scene graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum SegmentId {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Rigid group carrying the right-hand pair.
    RightPivot,
}

impl SegmentId {
    pub const ALL: [SegmentId; 5] = [
        SegmentId::TopLeft,
        SegmentId::TopRight,
        SegmentId::BottomLeft,
        SegmentId::BottomRight,
        SegmentId::RightPivot,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
            Self::RightPivot => 4,
        }
    }

    /// Node this segment is posed relative to; `None` means the paper root.
    pub const fn parent(self) -> Option<SegmentId> {
        match self {
            Self::TopRight | Self::BottomRight => Some(Self::RightPivot),
            _ => None,
        }
    }

    /// Whether this node may change rotation at all.
    pub const fn rotates(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::RightPivot)
    }

    /// Offset of the quadrant geometry from the node anchor.
    pub fn geometry_offset(self, dims: PaperDims) -> Vec3 {
        match self {
            Self::TopLeft | Self::TopRight => Vec3::new(0.0, dims.height / 4.0, 0.0),
            _ => Vec3::ZERO,
        }
    }
}

/// Surface size in scene units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaperDims {
    pub width: f64,
    pub height: f64,
}

impl Default for PaperDims {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 4.0,
        }
    }
}

impl PaperDims {
    pub fn validate(&self) -> FoldResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(FoldError::validation("paper width must be finite and > 0"));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(FoldError::validation("paper height must be finite and > 0"));
        }
        Ok(())
    }
}

/// Position, Euler rotation (radians) and uniform scale of one node, relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f64,
}

impl SegmentPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.position
            .max_abs_diff(other.position)
            .max(self.rotation.max_abs_diff(other.rotation))
            .max((self.scale - other.scale).abs())
    }
}

impl Lerp for SegmentPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            position: Vec3::lerp(&a.position, &b.position, t),
            rotation: Vec3::lerp(&a.rotation, &b.rotation, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
        }
    }
}

/// One full configuration of all five nodes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaperPose {
    poses: [SegmentPose; 5],
}

impl PaperPose {
    pub fn get(&self, id: SegmentId) -> SegmentPose {
        self.poses[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, SegmentPose)> + '_ {
        SegmentId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        SegmentId::ALL
            .into_iter()
            .all(|id| self.get(id).max_abs_diff(&other.get(id)) <= tol)
    }
}

fn flat_positions(dims: PaperDims) -> [Vec3; 5] {
    let qx = dims.width / 4.0;
    let qy = dims.height / 4.0;
    [
        Vec3::new(-qx, 0.0, 0.0),
        Vec3::new(qx, 0.0, 0.0),
        Vec3::new(-qx, -qy, 0.0),
        Vec3::new(qx, -qy, 0.0),
        Vec3::ZERO,
    ]
}

/// Fully flat: every rotation zero, every node at its centered offset.
pub fn unfolded_pose(dims: PaperDims) -> PaperPose {
    let pos = flat_positions(dims);
    PaperPose {
        poses: pos.map(SegmentPose::at),
    }
}

/// Fully creased: top segments flipped onto the bottom ones, then the right pair flipped over
/// onto the left pair and lifted so it rests on top.
pub fn folded_pose(dims: PaperDims) -> PaperPose {
    let mut pose = unfolded_pose(dims);
    for id in [SegmentId::TopLeft, SegmentId::TopRight] {
        let p = &mut pose.poses[id.index()];
        p.rotation.x = PI;
        p.position.z = LAYER_GAP;
    }
    let pivot = &mut pose.poses[SegmentId::RightPivot.index()];
    pivot.rotation.y = PI;
    pivot.position.z = 2.0 * LAYER_GAP;
    pose
}

/// Pose arena read by the renderer every frame.
///
/// A slot is `None` until the render layer reports its node as attached. The fold sequencer is
/// the only writer; writes to detached slots are dropped.
#[derive(Clone, Debug, Default)]
pub struct PoseStore {
    slots: [Option<SegmentPose>; 5],
}

impl PoseStore {
    pub fn attach(&mut self, id: SegmentId) -> bool {
        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(SegmentPose::IDENTITY);
        true
    }

    pub fn detach(&mut self, id: SegmentId) {
        self.slots[id.index()] = None;
    }

    pub fn is_attached(&self, id: SegmentId) -> bool {
        self.slots[id.index()].is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn get(&self, id: SegmentId) -> Option<SegmentPose> {
        self.slots[id.index()]
    }

    pub(crate) fn write(&mut self, id: SegmentId, pose: SegmentPose) {
        if let Some(slot) = self.slots[id.index()].as_mut() {
            *slot = pose;
        }
    }

    /// Snapshot of the whole arena, if every node is attached.
    pub fn pose(&self) -> Option<PaperPose> {
        let mut poses = [SegmentPose::IDENTITY; 5];
        for id in SegmentId::ALL {
            poses[id.index()] = self.get(id)?;
        }
        Some(PaperPose { poses })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paper/segment.rs"]
mod tests;
