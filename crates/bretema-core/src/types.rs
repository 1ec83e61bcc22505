//! Fixed-function render state and area helpers.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Face culling mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cull {
    /// No culling.
    #[default]
    None,
    /// Cull clockwise (front) faces.
    Cw,
    /// Cull counter-clockwise (back) faces.
    Ccw,
}

/// Comparison function for depth/stencil tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compare {
    /// Test disabled.
    #[default]
    None,
    Less,
    LessEq,
    Great,
    GreatEq,
}

/// Depth test function.
pub type Depth = Compare;

/// Multisample count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Samples {
    #[default]
    X1,
    X2,
    X4,
    X8,
    X16,
    X32,
    X64,
}

impl Samples {
    /// Number of samples per pixel.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        1 << self as u32
    }
}

/// Axis-aligned rectangle stored as start and end corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Area2D {
    /// Start corner.
    pub off: Vec2,
    /// End corner.
    pub ext: Vec2,
}

impl Area2D {
    #[must_use]
    pub const fn from_init_end(init: Vec2, end: Vec2) -> Self {
        Self {
            off: init,
            ext: end,
        }
    }

    #[must_use]
    pub fn from_init_size(init: Vec2, size: Vec2) -> Self {
        Self {
            off: init,
            ext: init + size,
        }
    }

    #[must_use]
    pub fn w(&self) -> f32 {
        (self.ext - self.off).x
    }

    #[must_use]
    pub fn h(&self) -> f32 {
        (self.ext - self.off).y
    }

    /// `(x, y, width, height)`.
    #[must_use]
    pub fn as_rect(&self) -> Vec4 {
        let size = self.ext - self.off;
        Vec4::new(self.off.x, self.off.y, size.x, size.y)
    }
}

/// Axis-aligned box stored as start and end corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Area3D {
    /// Start corner.
    pub off: Vec3,
    /// End corner.
    pub ext: Vec3,
}

impl Area3D {
    #[must_use]
    pub const fn from_init_end(init: Vec3, end: Vec3) -> Self {
        Self {
            off: init,
            ext: end,
        }
    }

    #[must_use]
    pub fn from_init_size(init: Vec3, size: Vec3) -> Self {
        Self {
            off: init,
            ext: init + size,
        }
    }

    #[must_use]
    pub fn w(&self) -> f32 {
        (self.ext - self.off).x
    }

    #[must_use]
    pub fn h(&self) -> f32 {
        (self.ext - self.off).y
    }

    #[must_use]
    pub fn d(&self) -> f32 {
        (self.ext - self.off).z
    }
}
