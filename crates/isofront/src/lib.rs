//! Signed level-set fields reconstructed from volume-of-fluid data.
//!
//! Scope
//! - `vof`: closed-form volume-fraction and interface-measure quadrature for
//!   linearly interpolated vertex fields on the five supported cell shapes.
//! - `solver`: the per-cell inverse problem, vertex values that reproduce a
//!   target volume fraction for a fixed interface normal.
//! - `reinit`: the mesh-wide fixed-point driver tying normal estimation,
//!   per-cell solves, and shared-vertex averaging into a convergent field.
//! - `mesh`/`field`/`normal`: a small in-memory mesh, flat scalar fields, and
//!   the injected gradient capability the driver consumes.
//!
//! Orientation convention: the level set is negative in the occupied phase
//! (volume fraction near one) and positive in the empty one; the interface is
//! the zero contour.

pub mod aggregate;
pub mod dump;
pub mod field;
pub mod mesh;
pub mod normal;
pub mod reconstruct;
pub mod reinit;
pub mod solver;
pub mod vof;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aggregate::{SignConflict, VertexAccumulator};
    pub use crate::field::{FieldLocation, ScalarField, UNSET};
    pub use crate::mesh::{line_mesh, quad_grid, CellId, CellTopology, Mesh, VertexId};
    pub use crate::normal::{GradientOperator, LeastSquaresGradient, NormalEstimator};
    pub use crate::reconstruct::{planar_vertex_values, vof_from_function, LevelSetFn};
    pub use crate::reinit::{reinitialize, ReinitCfg, ReinitReport};
    pub use crate::solver::{solve_target_vof, SolverCfg};
    pub use crate::vof::{cell_gradient, vof_moments, VofMoments};
    pub use nalgebra::Vector3;
}
