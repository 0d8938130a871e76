use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::model::{Model, Triangle};

/// Per-axis extents of a model.
///
/// A model without triangles yields `min = f32::MAX` and `max = -f32::MAX` on
/// every axis, so `min > max`. See [`Bounds::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(-f32::MAX),
    };

    #[cfg(not(feature = "parallel"))]
    pub fn of(model: &Model) -> Bounds {
        model
            .triangles()
            .iter()
            .fold(Bounds::EMPTY, |bounds, triangle| bounds.include_triangle(triangle))
    }

    #[cfg(feature = "parallel")]
    pub fn of(model: &Model) -> Bounds {
        model
            .triangles()
            .par_iter()
            .fold(
                || Bounds::EMPTY,
                |bounds, triangle| bounds.include_triangle(triangle),
            )
            .reduce(|| Bounds::EMPTY, Bounds::union)
    }

    pub fn include(self, point: Vec3) -> Bounds {
        Bounds {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    fn include_triangle(self, triangle: &Triangle) -> Bounds {
        triangle
            .vertices()
            .iter()
            .fold(self, |bounds, &vertex| bounds.include(vertex))
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `max - min` on every axis. Negative for an empty model.
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }
}
