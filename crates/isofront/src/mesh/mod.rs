//! In-memory polytope meshes: cells, vertices, and fixed canonical orderings.
//!
//! Purpose
//! - Provide the narrow mesh surface the reinitialization core reads:
//!   topology per cell, ordered vertex coordinates, cell centers, and
//!   cell-vertex incidence. Nothing here is mutated after construction.
//! - Structured generators (`line_mesh`, `quad_grid`) cover tests and demos;
//!   arbitrary meshes go through `Mesh::new`, which validates the layout.
//!
//! Coordinates are zero-padded `Vector3<f64>` regardless of the mesh
//! dimension, so downstream code never branches on storage width.

mod grid;
mod types;

pub use grid::{line_mesh, quad_grid};
pub use types::{Cell, CellId, CellTopology, Mesh, MeshError, VertexId};
