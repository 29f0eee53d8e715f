use crate::error::Error;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Shape of a reference cell.
///
/// The reference cells follow the biunit convention: boxes are `[-1, 1]^d`, and simplices
/// have a vertex at `(-1, ..., -1)` plus one vertex at `+1` along each axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellShape {
    Vertex,
    Interval,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
}

#[rustfmt::skip]
const INTERVAL_VERTICES: [f64; 2] = [
    -1.0,
     1.0,
];

#[rustfmt::skip]
const TRIANGLE_VERTICES: [f64; 6] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
];

#[rustfmt::skip]
const QUADRILATERAL_VERTICES: [f64; 8] = [
    -1.0, -1.0,
     1.0, -1.0,
     1.0,  1.0,
    -1.0,  1.0,
];

#[rustfmt::skip]
const TETRAHEDRON_VERTICES: [f64; 12] = [
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0, -1.0,  1.0,
];

#[rustfmt::skip]
const HEXAHEDRON_VERTICES: [f64; 24] = [
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
];

// Facet i of a simplex is the facet opposite to vertex i. Facets of boxes list their
// vertices as a cycle, matching the vertex order of the facet's own reference cell.
const INTERVAL_FACETS: [&[usize]; 2] = [&[0], &[1]];
const TRIANGLE_FACETS: [&[usize]; 3] = [&[1, 2], &[0, 2], &[0, 1]];
const QUADRILATERAL_FACETS: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const TETRAHEDRON_FACETS: [&[usize]; 4] = [&[1, 2, 3], &[0, 2, 3], &[0, 1, 3], &[0, 1, 2]];
const HEXAHEDRON_FACETS: [&[usize]; 6] = [
    &[0, 1, 2, 3],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];

impl CellShape {
    /// Topological dimension of the cell.
    pub fn dimension(&self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Interval => 1,
            Self::Triangle | Self::Quadrilateral => 2,
            Self::Tetrahedron | Self::Hexahedron => 3,
        }
    }

    pub fn is_simplex(&self) -> bool {
        matches!(self, Self::Vertex | Self::Interval | Self::Triangle | Self::Tetrahedron)
    }

    pub fn num_vertices(&self) -> usize {
        match self {
            Self::Vertex => 1,
            Self::Interval => 2,
            Self::Triangle => 3,
            Self::Quadrilateral | Self::Tetrahedron => 4,
            Self::Hexahedron => 8,
        }
    }

    /// The vertices of the reference cell, one per row.
    pub fn reference_vertices(&self) -> Array2<f64> {
        let coords: &[f64] = match self {
            Self::Vertex => &[],
            Self::Interval => &INTERVAL_VERTICES,
            Self::Triangle => &TRIANGLE_VERTICES,
            Self::Quadrilateral => &QUADRILATERAL_VERTICES,
            Self::Tetrahedron => &TETRAHEDRON_VERTICES,
            Self::Hexahedron => &HEXAHEDRON_VERTICES,
        };
        Array2::from_shape_vec((self.num_vertices(), self.dimension()), coords.to_vec())
            .expect("Internal error: Vertex table must match cell shape")
    }

    fn facets(&self) -> &'static [&'static [usize]] {
        match self {
            Self::Vertex => &[],
            Self::Interval => &INTERVAL_FACETS,
            Self::Triangle => &TRIANGLE_FACETS,
            Self::Quadrilateral => &QUADRILATERAL_FACETS,
            Self::Tetrahedron => &TETRAHEDRON_FACETS,
            Self::Hexahedron => &HEXAHEDRON_FACETS,
        }
    }

    pub fn num_facets(&self) -> usize {
        self.facets().len()
    }

    /// The shape of the facets of the cell.
    pub fn facet_shape(&self) -> Result<CellShape, Error> {
        match self {
            Self::Vertex => Err(Error::UnsupportedShape(*self)),
            Self::Interval => Ok(Self::Vertex),
            Self::Triangle | Self::Quadrilateral => Ok(Self::Interval),
            Self::Tetrahedron => Ok(Self::Triangle),
            Self::Hexahedron => Ok(Self::Quadrilateral),
        }
    }

    /// Indices of the cell vertices on the given facet.
    pub fn facet_vertices(&self, facet: usize) -> Result<&'static [usize], Error> {
        self.facets()
            .get(facet)
            .copied()
            .ok_or(Error::InvalidFacet { shape: *self, facet })
    }
}

impl Display for CellShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Interval => "interval",
            Self::Triangle => "triangle",
            Self::Quadrilateral => "quadrilateral",
            Self::Tetrahedron => "tetrahedron",
            Self::Hexahedron => "hexahedron",
        };
        write!(f, "{}", name)
    }
}
