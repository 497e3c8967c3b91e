//! Interface-normal estimation over an injected differential capability.
//!
//! The core never differentiates a cell-centered field itself: it consumes
//! `GradientOperator`, one first partial derivative at a cell center per
//! call. `LeastSquaresGradient` is the in-memory reference implementation;
//! finite-difference or meshless operators satisfy the same contract.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::field::{FieldLocation, ScalarField};
use crate::mesh::{CellId, Mesh};
use crate::vof::{self, VofError};

/// Gradient magnitudes below this cannot orient an interface.
const MIN_GRADIENT: f64 = 1e-14;

/// Errors surfaced while estimating gradients and normals.
#[derive(Debug, Error)]
pub enum GradientError {
    /// The stencil's normal equations are singular (too few or collinear
    /// neighbors).
    #[error("cell {cell}: gradient stencil is singular")]
    SingularStencil { cell: CellId },
    /// The field is locally flat; no interface orientation exists.
    #[error("cell {cell}: gradient magnitude too small to orient an interface")]
    ZeroGradient { cell: CellId },
    #[error(transparent)]
    Vof(#[from] VofError),
}

/// First partial derivative of a scalar field at a cell center.
pub trait GradientOperator {
    fn eval_derivative(
        &self,
        mesh: &Mesh,
        field: &ScalarField,
        cell: CellId,
        axis: usize,
    ) -> Result<f64, GradientError>;
}

/// Unit interface normals built from a gradient capability.
pub struct NormalEstimator<'a, G: GradientOperator> {
    op: &'a G,
}

impl<'a, G: GradientOperator> NormalEstimator<'a, G> {
    pub fn new(op: &'a G) -> Self {
        Self { op }
    }

    /// `-grad(vof)`, normalized: points out of the occupied phase, matching
    /// the level-set sign convention.
    pub fn from_vof(
        &self,
        mesh: &Mesh,
        vof: &ScalarField,
        cell: CellId,
    ) -> Result<Vector3<f64>, GradientError> {
        self.unit(mesh, vof, cell, -1.0)
    }

    /// `+grad(phi)`, normalized: the same orientation as `from_vof` once the
    /// level set follows its sign convention.
    pub fn from_level_set(
        &self,
        mesh: &Mesh,
        level_set: &ScalarField,
        cell: CellId,
    ) -> Result<Vector3<f64>, GradientError> {
        self.unit(mesh, level_set, cell, 1.0)
    }

    fn unit(
        &self,
        mesh: &Mesh,
        field: &ScalarField,
        cell: CellId,
        sign: f64,
    ) -> Result<Vector3<f64>, GradientError> {
        let mut n = Vector3::zeros();
        for axis in 0..mesh.dim() {
            n[axis] = sign * self.op.eval_derivative(mesh, field, cell, axis)?;
        }
        let norm = n.norm();
        if norm <= MIN_GRADIENT {
            return Err(GradientError::ZeroGradient { cell });
        }
        Ok(n / norm)
    }
}

/// Reference gradient operator for the in-memory mesh.
///
/// Cell-valued fields use weighted least squares over the vertex-adjacent
/// neighbor cells (weights `1/r^2`); vertex-valued fields use the cell's own
/// linear-interpolant gradient, so the operator never needs a stencil wider
/// than one cell for them.
#[derive(Clone, Copy, Debug)]
pub struct LeastSquaresGradient {
    /// Singularity guard on the normal-equation determinant.
    pub det_min: f64,
}

impl Default for LeastSquaresGradient {
    fn default() -> Self {
        Self { det_min: 1e-12 }
    }
}

impl LeastSquaresGradient {
    fn cell_field_gradient(
        &self,
        mesh: &Mesh,
        field: &ScalarField,
        cell: CellId,
    ) -> Result<Vector3<f64>, GradientError> {
        let x0 = mesh.cell_center(cell);
        let phi0 = field.values()[cell];
        let neighbors = mesh.neighbor_cells(cell);
        if neighbors.is_empty() {
            return Err(GradientError::SingularStencil { cell });
        }
        match mesh.dim() {
            1 => {
                let (mut a, mut b) = (0.0, 0.0);
                for &nb in &neighbors {
                    let r = mesh.cell_center(nb) - x0;
                    let w = 1.0 / r.norm_squared();
                    let dphi = field.values()[nb] - phi0;
                    a += w * r.x * r.x;
                    b += w * r.x * dphi;
                }
                if a.abs() < self.det_min {
                    return Err(GradientError::SingularStencil { cell });
                }
                Ok(Vector3::new(b / a, 0.0, 0.0))
            }
            2 => {
                let (mut a11, mut a12, mut a22) = (0.0, 0.0, 0.0);
                let (mut b1, mut b2) = (0.0, 0.0);
                for &nb in &neighbors {
                    let r = mesh.cell_center(nb) - x0;
                    let w = 1.0 / r.norm_squared();
                    let dphi = field.values()[nb] - phi0;
                    a11 += w * r.x * r.x;
                    a12 += w * r.x * r.y;
                    a22 += w * r.y * r.y;
                    b1 += w * r.x * dphi;
                    b2 += w * r.y * dphi;
                }
                let det = a11 * a22 - a12 * a12;
                if det.abs() < self.det_min {
                    return Err(GradientError::SingularStencil { cell });
                }
                let inv = 1.0 / det;
                Ok(Vector3::new(
                    (a22 * b1 - a12 * b2) * inv,
                    (a11 * b2 - a12 * b1) * inv,
                    0.0,
                ))
            }
            _ => {
                let mut a = Matrix3::zeros();
                let mut b = Vector3::zeros();
                for &nb in &neighbors {
                    let r = mesh.cell_center(nb) - x0;
                    let w = 1.0 / r.norm_squared();
                    let dphi = field.values()[nb] - phi0;
                    a += w * r * r.transpose();
                    b += w * dphi * r;
                }
                if a.determinant().abs() < self.det_min {
                    return Err(GradientError::SingularStencil { cell });
                }
                a.try_inverse()
                    .map(|inv| inv * b)
                    .ok_or(GradientError::SingularStencil { cell })
            }
        }
    }
}

impl GradientOperator for LeastSquaresGradient {
    fn eval_derivative(
        &self,
        mesh: &Mesh,
        field: &ScalarField,
        cell: CellId,
        axis: usize,
    ) -> Result<f64, GradientError> {
        let g = match field.location() {
            FieldLocation::Cells => self.cell_field_gradient(mesh, field, cell)?,
            FieldLocation::Vertices => {
                let coords = mesh.cell_coords(cell);
                let values: Vec<f64> = mesh.cell(cell)
                    .vertices
                    .iter()
                    .map(|&v| field.values()[v])
                    .collect();
                vof::cell_gradient(mesh.cell(cell).topology, &coords, &values)?
            }
        };
        Ok(g[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{line_mesh, quad_grid};

    #[test]
    fn least_squares_recovers_linear_cell_field() {
        let mesh = quad_grid(5, 5);
        let mut field = ScalarField::cell_field(&mesh);
        for c in 0..mesh.cell_count() {
            let x = mesh.cell_center(c);
            field.set(c, 2.0 * x.x - 3.0 * x.y + 0.7);
        }
        let op = LeastSquaresGradient::default();
        for c in 0..mesh.cell_count() {
            let gx = op.eval_derivative(&mesh, &field, c, 0).unwrap();
            let gy = op.eval_derivative(&mesh, &field, c, 1).unwrap();
            assert!((gx - 2.0).abs() < 1e-10, "cell {c}: gx {gx}");
            assert!((gy + 3.0).abs() < 1e-10, "cell {c}: gy {gy}");
        }
    }

    #[test]
    fn least_squares_on_a_line_mesh() {
        let mesh = line_mesh(6);
        let mut field = ScalarField::cell_field(&mesh);
        for c in 0..mesh.cell_count() {
            field.set(c, -1.5 * mesh.cell_center(c).x);
        }
        let op = LeastSquaresGradient::default();
        for c in 0..mesh.cell_count() {
            let g = op.eval_derivative(&mesh, &field, c, 0).unwrap();
            assert!((g + 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn vertex_field_gradient_is_the_interpolant_slope() {
        let mesh = quad_grid(2, 2);
        let mut field = ScalarField::vertex_field(&mesh);
        for v in 0..mesh.vertex_count() {
            let p = mesh.vertex(v);
            field.set(v, 0.25 * p.x + 4.0 * p.y);
        }
        let op = LeastSquaresGradient::default();
        for c in 0..mesh.cell_count() {
            let gx = op.eval_derivative(&mesh, &field, c, 0).unwrap();
            let gy = op.eval_derivative(&mesh, &field, c, 1).unwrap();
            assert!((gx - 0.25).abs() < 1e-12);
            assert!((gy - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn normals_are_unit_and_oriented() {
        let mesh = quad_grid(5, 5);
        // Fraction falls off with x, so the normal points along +x.
        let mut vof = ScalarField::cell_field(&mesh);
        for c in 0..mesh.cell_count() {
            vof.set(c, 1.0 - mesh.cell_center(c).x);
        }
        let op = LeastSquaresGradient::default();
        let est = NormalEstimator::new(&op);
        let n = est.from_vof(&mesh, &vof, 12).unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 1.0).abs() < 1e-10);
        assert!(n.y.abs() < 1e-10 && n.z.abs() < 1e-12);
    }

    #[test]
    fn flat_field_has_no_orientation() {
        let mesh = quad_grid(3, 3);
        let vof = ScalarField::cell_field(&mesh);
        let op = LeastSquaresGradient::default();
        let est = NormalEstimator::new(&op);
        let err = est.from_vof(&mesh, &vof, 4).unwrap_err();
        assert!(matches!(err, GradientError::ZeroGradient { cell: 4 }));
    }
}
