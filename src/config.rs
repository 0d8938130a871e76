use serde::{Deserialize, Serialize};

use crate::projection::View;

pub const DEFAULT_GRID_SIZE: usize = 60;

/// How a model is turned into a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Grid resolution. The preview is `grid_size + 1` characters wide and
    /// `grid_size / 2 + 1` lines tall.
    pub grid_size: usize,
    pub view: View,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            grid_size: DEFAULT_GRID_SIZE,
            view: View::Side,
        }
    }
}

impl ProjectionConfig {
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }
}
