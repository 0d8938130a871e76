use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::model::{Model, Triangle};

/// Direction the model is viewed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Side,
    Front,
    Top,
}

/// Which model axes (0 = x, 1 = y, 2 = z) become grid X, grid Y and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub x: usize,
    pub y: usize,
    pub depth: usize,
}

impl View {
    pub const ALL: [View; 3] = [View::Side, View::Front, View::Top];

    pub const fn axes(self) -> Axes {
        match self {
            View::Side => Axes { x: 2, y: 1, depth: 0 },
            View::Front => Axes { x: 2, y: 0, depth: 1 },
            View::Top => Axes { x: 1, y: 0, depth: 2 },
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            View::Side => "side",
            View::Front => "front",
            View::Top => "top",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownView(pub String);

impl fmt::Display for UnknownView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown view `{}`, expected side, front or top", self.0)
    }
}

impl std::error::Error for UnknownView {}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "side" => Ok(View::Side),
            "front" => Ok(View::Front),
            "top" => Ok(View::Top),
            _ => Err(UnknownView(s.to_string())),
        }
    }
}

/// Row-major grid of normalised depth values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<f32>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Grid {
            rows,
            columns,
            cells: vec![0.0; rows * columns],
        }
    }

    /// The grid used for a resolution of `size`: `size / 2 + 1` rows (terminal
    /// cells are about twice as tall as wide) by `size + 1` columns.
    pub fn for_size(size: usize) -> Self {
        Grid::new(size / 2 + 1, size + 1)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        if row < self.rows && column < self.columns {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks(0) panics; a zero-column grid has no rows worth yielding
        self.cells.chunks(self.columns.max(1)).take(self.rows)
    }

    /// Keeps `value` at (row, column) if it beats what is there. NaN never
    /// wins. Returns false when the position is outside the grid.
    pub fn raise(&mut self, row: usize, column: usize, value: f32) -> bool {
        if row >= self.rows || column >= self.columns {
            return false;
        }
        let cell = &mut self.cells[row * self.columns + column];
        if value > *cell {
            *cell = value;
        }
        true
    }

    /// Cell-wise maximum of two grids of the same shape.
    pub fn merge_max(mut self, other: Grid) -> Grid {
        debug_assert_eq!((self.rows, self.columns), (other.rows, other.columns));
        for (cell, value) in self.cells.iter_mut().zip(other.cells) {
            if value > *cell {
                *cell = value;
            }
        }
        self
    }
}

/// Everything needed to place a vertex, derived once per projection.
#[derive(Debug, Clone, Copy)]
struct Frame {
    size: usize,
    axes: Axes,
    bounds: Bounds,
    scale: f32,
    depth_extent: f32,
}

impl Frame {
    fn new(model: &Model, size: usize, view: View) -> Self {
        let axes = view.axes();
        let bounds = model.bounds();
        let dimensions = bounds.dimensions();
        let scale = dimensions[axes.x].max(dimensions[axes.y]) / size as f32;
        Frame {
            size,
            axes,
            bounds,
            scale,
            depth_extent: dimensions[axes.depth],
        }
    }

    fn plot(&self, grid: &mut Grid, triangle: &Triangle) {
        let (min, axes) = (self.bounds.min, self.axes);
        for vertex in triangle.vertices() {
            let gx = ((vertex[axes.x] - min[axes.x]) / self.scale) as i64;
            let gy = ((vertex[axes.y] - min[axes.y]) / self.scale) as i64;
            let depth = (vertex[axes.depth] - min[axes.depth]) / self.depth_extent;

            let row = (self.size as i64 - gx) / 2;
            if row < 0 || gy < 0 || !grid.raise(row as usize, gy as usize, depth) {
                trace!("vertex {} falls outside the grid at ({}, {})", vertex, row, gy);
            }
        }
    }
}

/// Projects every vertex of `model` onto a grid of resolution `size` as seen
/// from `view`.
///
/// Each cell holds the largest normalised depth of the vertices landing in it.
/// A model that is flat along the depth axis yields NaN depths, which leave
/// their cells at 0.
pub fn project(model: &Model, size: usize, view: View) -> Grid {
    let frame = Frame::new(model, size, view);
    debug!(
        "projecting {} triangles from the {}: axes {:?}, scale {}",
        model.triangle_count(),
        view,
        frame.axes,
        frame.scale
    );
    plot_all(&frame, model.triangles())
}

#[cfg(not(feature = "parallel"))]
fn plot_all(frame: &Frame, triangles: &[Triangle]) -> Grid {
    let mut grid = Grid::for_size(frame.size);
    for triangle in triangles {
        frame.plot(&mut grid, triangle);
    }
    grid
}

#[cfg(feature = "parallel")]
fn plot_all(frame: &Frame, triangles: &[Triangle]) -> Grid {
    triangles
        .par_iter()
        .fold(
            || Grid::for_size(frame.size),
            |mut grid, triangle| {
                frame.plot(&mut grid, triangle);
                grid
            },
        )
        .reduce(|| Grid::for_size(frame.size), Grid::merge_max)
}
