//! Closed-form volume-fraction quadrature for linearly interpolated fields.
//!
//! Model
//! - A cell carries one level-set value per vertex and the field inside is
//!   the linear interpolant. The volume fraction is the integral of the
//!   Heaviside of the negated interpolant over the cell, and the interface
//!   measure is the integral of its delta function, both evaluated in closed
//!   form per shape. These are the element rules of Holdych, Noble and Secor,
//!   "Quadrature rules for triangular and tetrahedral elements with
//!   generalized functions", Int. J. Numer. Meth. Engng 73:1310-1327, 2008.
//! - Simplex shapes are exact by sign-case analysis on the vertex values.
//!   The quadrilateral integrates over a fixed two-triangle split and the
//!   hexahedron over a fixed six-tetrahedron split; fractions, interface
//!   measures, and gradients all see the same decomposition.
//! - Each topology keeps its own formula behind one dispatch point; there is
//!   no generic polytope fallback.
//!
//! Sign convention: negative level set marks the occupied phase, so `vof` is
//! the fraction of the cell where the interpolant is negative. Planar shapes
//! are expected in the `z = 0` plane (the mesh layer guarantees this).

mod composite;
mod simplex;

pub use composite::{vof_hexahedron, vof_quadrilateral};
pub use simplex::{vof_segment, vof_tetrahedron, vof_triangle};

use nalgebra::Vector3;
use thiserror::Error;

use crate::mesh::CellTopology;

/// Moments of a linearly interpolated level-set field over one cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct VofMoments {
    /// Volume fraction of the negative phase, in `[0, 1]`.
    pub vof: f64,
    /// Interface measure of the interpolant (the delta-function integral).
    /// Equals the geometric cut measure when the vertex values are a signed
    /// distance, and is the exact sensitivity of `vof * measure` to a
    /// uniform shift of the vertex values.
    pub interface: f64,
    /// Cell measure: length, area, or volume.
    pub measure: f64,
}

/// Errors surfaced by the quadrature kernel.
#[derive(Debug, Error)]
pub enum VofError {
    /// The vertex data does not match the topology's canonical layout.
    #[error("{topology:?} expects {expected} vertices, got {got}")]
    UnsupportedTopology {
        topology: CellTopology,
        expected: usize,
        got: usize,
    },
    /// The cell has no measure to integrate over.
    #[error("degenerate cell geometry (measure {measure:.3e})")]
    DegenerateCell { measure: f64 },
}

fn check_layout(
    topology: CellTopology,
    coords_len: usize,
    values_len: usize,
) -> Result<(), VofError> {
    let expected = topology.vertex_count();
    if coords_len != expected {
        return Err(VofError::UnsupportedTopology {
            topology,
            expected,
            got: coords_len,
        });
    }
    if values_len != expected {
        return Err(VofError::UnsupportedTopology {
            topology,
            expected,
            got: values_len,
        });
    }
    Ok(())
}

/// Volume fraction, interface measure, and cell measure of one cell.
///
/// `coords` and `values` follow the topology's canonical vertex ordering.
pub fn vof_moments(
    topology: CellTopology,
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<VofMoments, VofError> {
    check_layout(topology, coords.len(), values.len())?;
    match topology {
        CellTopology::Segment => simplex::vof_segment(coords, values),
        CellTopology::Triangle => simplex::vof_triangle(coords, values),
        CellTopology::Quadrilateral => composite::vof_quadrilateral(coords, values),
        CellTopology::Tetrahedron => simplex::vof_tetrahedron(coords, values),
        CellTopology::Hexahedron => composite::vof_hexahedron(coords, values),
    }
}

/// Gradient of the linear interpolant at the cell, zero-padded to 3D.
///
/// Exact for simplex shapes; measure-weighted over the decomposition for the
/// quadrilateral and hexahedron, so it matches the interpolant `vof_moments`
/// integrates.
pub fn cell_gradient(
    topology: CellTopology,
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    check_layout(topology, coords.len(), values.len())?;
    match topology {
        CellTopology::Segment => simplex::gradient_segment(coords, values),
        CellTopology::Triangle => simplex::gradient_triangle(coords, values),
        CellTopology::Quadrilateral => composite::gradient_quadrilateral(coords, values),
        CellTopology::Tetrahedron => simplex::gradient_tetrahedron(coords, values),
        CellTopology::Hexahedron => composite::gradient_hexahedron(coords, values),
    }
}
