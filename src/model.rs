use std::convert::TryFrom;
use std::fmt;

use glam::Vec3;

use crate::bounds::Bounds;

/// One facet: a normal, three vertices and the attribute byte count carried
/// by binary records.
///
/// The normal is stored as decoded and is never checked against the vertex
/// winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    normal: Vec3,
    vertices: [Vec3; 3],
    attribute_byte_count: u16,
}

impl Triangle {
    pub fn new(normal: Vec3, vertices: [Vec3; 3], attribute_byte_count: u16) -> Self {
        Triangle {
            normal,
            vertices,
            attribute_byte_count,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn attribute_byte_count(&self) -> u16 {
        self.attribute_byte_count
    }
}

/// A decoded STL mesh.
///
/// Triangles keep file order. The model owns all of its data and holds no
/// reference to the buffer it was decoded from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    header: String,
    triangles: Vec<Triangle>,
}

impl Model {
    pub fn new(header: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Model {
            header: header.into(),
            triangles,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Equal to `triangles().len()`, saturating at `u32::MAX`, the largest
    /// count a binary STL can declare.
    pub fn triangle_count(&self) -> u32 {
        saturating_count(self.triangles.len())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::of(self)
    }

    pub(crate) fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }
}

fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bounds = self.bounds();
        writeln!(f, "Header: {}", self.header)?;
        writeln!(f, "Triangles: {}", self.triangle_count())?;
        writeln!(f, "Dimensions: {}", bounds.dimensions())?;
        writeln!(f, "Mins: {}", bounds.min)?;
        writeln!(f, "Maxs: {}", bounds.max)
    }
}
