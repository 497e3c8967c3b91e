//! Seeding vertex level-set values: planar interfaces and analytic fields.

use nalgebra::Vector3;

use crate::field::ScalarField;
use crate::mesh::Mesh;
use crate::vof::{vof_moments, VofError};

/// Analytic scalar level-set function `phi(x, t)`.
///
/// Blanket-implemented for closures, so `|p, t| ...` can be passed directly.
pub trait LevelSetFn {
    fn eval(&self, point: &Vector3<f64>, time: f64) -> f64;
}

impl<F> LevelSetFn for F
where
    F: Fn(&Vector3<f64>, f64) -> f64,
{
    #[inline]
    fn eval(&self, point: &Vector3<f64>, time: f64) -> f64 {
        self(point, time)
    }
}

/// Vertex values of a planar interface through the cell:
/// `c0 + n . (x - center)` per vertex.
pub fn planar_vertex_values(
    center: &Vector3<f64>,
    c0: f64,
    normal: &Vector3<f64>,
    coords: &[Vector3<f64>],
) -> Vec<f64> {
    coords
        .iter()
        .map(|p| c0 + normal.dot(&(p - center)))
        .collect()
}

/// Vertex values sampled from an analytic level-set function.
pub fn sampled_vertex_values<F: LevelSetFn>(
    f: &F,
    coords: &[Vector3<f64>],
    time: f64,
) -> Vec<f64> {
    coords.iter().map(|p| f.eval(p, time)).collect()
}

/// The cell-valued volume-fraction field implied by an analytic level-set
/// function: sample each cell's vertices and run the quadrature kernel.
pub fn vof_from_function<F: LevelSetFn>(
    mesh: &Mesh,
    f: &F,
    time: f64,
) -> Result<ScalarField, VofError> {
    let mut field = ScalarField::cell_field(mesh);
    for c in 0..mesh.cell_count() {
        let coords = mesh.cell_coords(c);
        let values = sampled_vertex_values(f, &coords, time);
        let m = vof_moments(mesh.cell(c).topology, &coords, &values)?;
        field.set(c, m.vof);
    }
    Ok(field)
}
