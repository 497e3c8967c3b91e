//! Per-cell inversion: vertex values that reproduce a target volume fraction.
//!
//! A damped Newton-style fixed point. The offset that would close the
//! remaining fraction error in one step is `error * measure / interface`;
//! half of it is applied per iteration, because the undamped step routinely
//! overshoots and ejects the interface from the cell.

use nalgebra::Vector3;
use thiserror::Error;

use crate::mesh::CellTopology;
use crate::reconstruct::planar_vertex_values;
use crate::vof::{vof_moments, VofError};

/// Tolerances and guards for the per-cell solve.
#[derive(Clone, Copy, Debug)]
pub struct SolverCfg {
    /// Convergence tolerance on the volume-fraction error.
    pub tol: f64,
    /// Step damping factor.
    pub damping: f64,
    /// Iteration cap; exhausted solves surface `MaxIterations`.
    pub max_iter: usize,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            tol: 1e-8,
            damping: 0.5,
            max_iter: 1000,
        }
    }
}

/// Errors surfaced by the per-cell solve.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Vof(#[from] VofError),
    /// The interface measure vanished, so no finite offset step exists.
    #[error("interface measure {interface:.3e} cannot support a finite step")]
    DegenerateInterface { interface: f64 },
    #[error("no convergence after {iters} iterations (residual {residual:.3e})")]
    MaxIterations { iters: usize, residual: f64 },
}

/// Solve for vertex values whose fraction matches `target_vof`, keeping the
/// interface planar with the given unit normal.
///
/// Starts from a plane through the cell center and shifts it along the
/// normal until the kernel reproduces the target.
pub fn solve_target_vof(
    topology: CellTopology,
    coords: &[Vector3<f64>],
    center: &Vector3<f64>,
    normal: &Vector3<f64>,
    target_vof: f64,
    cfg: &SolverCfg,
) -> Result<Vec<f64>, SolveError> {
    debug_assert!(
        (0.0..=1.0).contains(&target_vof),
        "target fraction {target_vof} outside [0, 1]"
    );
    let mut values = planar_vertex_values(center, 0.0, normal, coords);
    let mut moments = vof_moments(topology, coords, &values)?;
    let measure = moments.measure;
    let mut error = target_vof - moments.vof;
    let mut iters = 0usize;
    while error.abs() > cfg.tol {
        if iters >= cfg.max_iter {
            return Err(SolveError::MaxIterations {
                iters,
                residual: error.abs(),
            });
        }
        if moments.interface <= 0.0 {
            return Err(SolveError::DegenerateInterface {
                interface: moments.interface,
            });
        }
        let offset = cfg.damping * error * measure / moments.interface;
        if !offset.is_finite() {
            return Err(SolveError::DegenerateInterface {
                interface: moments.interface,
            });
        }
        for v in &mut values {
            *v -= offset;
        }
        moments = vof_moments(topology, coords, &values)?;
        error = target_vof - moments.vof;
        iters += 1;
    }
    Ok(values)
}
