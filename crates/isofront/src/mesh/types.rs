//! Mesh types: topology tags, cells, and the immutable mesh container.
//!
//! Canonical local vertex orderings (fixed per topology):
//! - Segment: endpoints `0, 1`.
//! - Triangle: counterclockwise `0, 1, 2`.
//! - Quadrilateral: one counterclockwise cycle `0, 1, 2, 3`.
//! - Tetrahedron: `1, 2, 3` counterclockwise seen from opposite `0`
//!   (positive orientation).
//! - Hexahedron: bottom cycle `0, 1, 2, 3`, top cycle `4, 5, 6, 7`, with
//!   vertex `4` stacked over vertex `0`.
//!
//! Planar shapes live in the `z = 0` plane; segments on the `x` axis line.
//! The mesh dimension must match the intrinsic dimension of its cells.

use nalgebra::Vector3;
use thiserror::Error;

/// Index of a cell in its mesh.
pub type CellId = usize;
/// Index of a vertex in its mesh.
pub type VertexId = usize;

/// Combinatorial cell shape; selects the quadrature formula applied to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellTopology {
    Segment,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
}

impl CellTopology {
    /// Number of vertices in the canonical layout.
    #[inline]
    pub fn vertex_count(self) -> usize {
        match self {
            CellTopology::Segment => 2,
            CellTopology::Triangle => 3,
            CellTopology::Quadrilateral => 4,
            CellTopology::Tetrahedron => 4,
            CellTopology::Hexahedron => 8,
        }
    }

    /// Intrinsic dimension of the shape.
    #[inline]
    pub fn dim(self) -> usize {
        match self {
            CellTopology::Segment => 1,
            CellTopology::Triangle | CellTopology::Quadrilateral => 2,
            CellTopology::Tetrahedron | CellTopology::Hexahedron => 3,
        }
    }
}

/// One cell: a topology tag plus its ordered incident vertices.
#[derive(Clone, Debug)]
pub struct Cell {
    pub topology: CellTopology,
    pub vertices: Vec<VertexId>,
}

impl Cell {
    #[inline]
    pub fn new(topology: CellTopology, vertices: Vec<VertexId>) -> Self {
        Self { topology, vertices }
    }
}

/// Errors surfaced while validating a mesh layout.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh dimension {dim} outside 1..=3")]
    BadDimension { dim: usize },
    #[error("cell {cell}: {topology:?} expects {expected} vertices, got {got}")]
    VertexCount {
        cell: CellId,
        topology: CellTopology,
        expected: usize,
        got: usize,
    },
    #[error("cell {cell}: vertex id {vertex} out of range (mesh has {nverts} vertices)")]
    VertexOutOfRange {
        cell: CellId,
        vertex: VertexId,
        nverts: usize,
    },
    #[error("cell {cell}: {topology:?} has dimension {shape_dim}, mesh has {dim}")]
    ShapeDimension {
        cell: CellId,
        topology: CellTopology,
        shape_dim: usize,
        dim: usize,
    },
}

/// Immutable cell/vertex mesh with derived centers and incidence.
///
/// Cell centers are the vertex centroid. Any fixed interior reference point
/// serves the planar reconstruction, since the per-cell solve absorbs the
/// offset along the normal.
#[derive(Clone, Debug)]
pub struct Mesh {
    dim: usize,
    vertices: Vec<Vector3<f64>>,
    cells: Vec<Cell>,
    centers: Vec<Vector3<f64>>,
    vertex_cells: Vec<Vec<CellId>>,
}

impl Mesh {
    /// Validate a layout and build the derived data.
    pub fn new(dim: usize, vertices: Vec<Vector3<f64>>, cells: Vec<Cell>) -> Result<Self, MeshError> {
        if !(1..=3).contains(&dim) {
            return Err(MeshError::BadDimension { dim });
        }
        for (c, cell) in cells.iter().enumerate() {
            let expected = cell.topology.vertex_count();
            if cell.vertices.len() != expected {
                return Err(MeshError::VertexCount {
                    cell: c,
                    topology: cell.topology,
                    expected,
                    got: cell.vertices.len(),
                });
            }
            if cell.topology.dim() != dim {
                return Err(MeshError::ShapeDimension {
                    cell: c,
                    topology: cell.topology,
                    shape_dim: cell.topology.dim(),
                    dim,
                });
            }
            for &v in &cell.vertices {
                if v >= vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        cell: c,
                        vertex: v,
                        nverts: vertices.len(),
                    });
                }
            }
        }
        Ok(Self::from_parts(dim, vertices, cells))
    }

    /// Build without validation; callers guarantee a canonical layout.
    pub(crate) fn from_parts(dim: usize, vertices: Vec<Vector3<f64>>, cells: Vec<Cell>) -> Self {
        let centers = cells
            .iter()
            .map(|cell| {
                let mut acc = Vector3::zeros();
                for &v in &cell.vertices {
                    acc += vertices[v];
                }
                acc / (cell.vertices.len() as f64)
            })
            .collect();
        let mut vertex_cells = vec![Vec::new(); vertices.len()];
        for (c, cell) in cells.iter().enumerate() {
            for &v in &cell.vertices {
                vertex_cells[v].push(c);
            }
        }
        Self {
            dim,
            vertices,
            cells,
            centers,
            vertex_cells,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> Vector3<f64> {
        self.vertices[v]
    }

    #[inline]
    pub fn cell(&self, c: CellId) -> &Cell {
        &self.cells[c]
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell_center(&self, c: CellId) -> Vector3<f64> {
        self.centers[c]
    }

    /// Ordered vertex coordinates of a cell, in the canonical local layout.
    pub fn cell_coords(&self, c: CellId) -> Vec<Vector3<f64>> {
        self.cells[c].vertices.iter().map(|&v| self.vertices[v]).collect()
    }

    /// Cells incident to a vertex.
    #[inline]
    pub fn cells_of_vertex(&self, v: VertexId) -> &[CellId] {
        &self.vertex_cells[v]
    }

    /// Cells sharing at least one vertex with `c`, excluding `c` itself.
    pub fn neighbor_cells(&self, c: CellId) -> Vec<CellId> {
        let mut out = Vec::new();
        for &v in &self.cells[c].vertices {
            for &other in &self.vertex_cells[v] {
                if other != c {
                    out.push(other);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
