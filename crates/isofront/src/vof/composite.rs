//! Quadrature on quadrilaterals and hexahedra via fixed simplex splits.
//!
//! The splits are canonical constants of the mesh layout: the quadrilateral
//! over its `0-2` diagonal, the hexahedron over its `0-6` corner diagonal.
//! A degenerate sub-simplex contributes nothing; the whole cell is
//! degenerate only when the total measure vanishes.

use nalgebra::Vector3;

use super::simplex::{
    gradient_triangle, gradient_tetrahedron, tetra_volume, triangle_area, vof_tetrahedron,
    vof_triangle,
};
use super::{VofError, VofMoments};

/// Triangle split of the quadrilateral cycle `0, 1, 2, 3`.
const QUAD_TRIS: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// Tetrahedron split of the hexahedron, all sharing the `0-6` diagonal.
const HEX_TETS: [[usize; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
    [0, 5, 1, 6],
];

fn accumulate<const K: usize>(
    splits: &[[usize; K]],
    coords: &[Vector3<f64>],
    values: &[f64],
    part: fn(&[Vector3<f64>], &[f64]) -> Result<VofMoments, VofError>,
) -> Result<VofMoments, VofError> {
    let mut negative = 0.0;
    let mut interface = 0.0;
    let mut measure = 0.0;
    for split in splits {
        let c = split.map(|i| coords[i]);
        let v = split.map(|i| values[i]);
        match part(&c, &v) {
            Ok(m) => {
                negative += m.vof * m.measure;
                interface += m.interface;
                measure += m.measure;
            }
            Err(VofError::DegenerateCell { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    Ok(VofMoments {
        vof: (negative / measure).clamp(0.0, 1.0),
        interface,
        measure,
    })
}

fn weighted_gradient<const K: usize>(
    splits: &[[usize; K]],
    coords: &[Vector3<f64>],
    values: &[f64],
    part: fn(&[Vector3<f64>], &[f64]) -> Result<Vector3<f64>, VofError>,
    part_measure: fn(&[Vector3<f64>]) -> f64,
) -> Result<Vector3<f64>, VofError> {
    let mut acc = Vector3::zeros();
    let mut measure = 0.0;
    for split in splits {
        let c = split.map(|i| coords[i]);
        let v = split.map(|i| values[i]);
        if let Ok(g) = part(&c, &v) {
            let m = part_measure(&c);
            acc += g * m;
            measure += m;
        }
    }
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    Ok(acc / measure)
}

/// Quadrilateral rule: two triangle rules over the diagonal split.
pub fn vof_quadrilateral(coords: &[Vector3<f64>], values: &[f64]) -> Result<VofMoments, VofError> {
    accumulate(&QUAD_TRIS, coords, values, vof_triangle)
}

/// Hexahedron rule: six tetrahedron rules over the diagonal split.
pub fn vof_hexahedron(coords: &[Vector3<f64>], values: &[f64]) -> Result<VofMoments, VofError> {
    accumulate(&HEX_TETS, coords, values, vof_tetrahedron)
}

pub(super) fn gradient_quadrilateral(
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    weighted_gradient(&QUAD_TRIS, coords, values, gradient_triangle, triangle_area)
}

pub(super) fn gradient_hexahedron(
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    weighted_gradient(&HEX_TETS, coords, values, gradient_tetrahedron, tetra_volume)
}
