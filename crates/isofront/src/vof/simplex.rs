//! Exact sign-case quadrature on simplex cells.
//!
//! On a simplex the linear interpolant is affine, so the negative region is
//! the simplex clipped by one plane and every moment has a closed form. The
//! case split is on how many vertex values are negative; crossing points are
//! only ever taken between vertices of opposite sign, so repeated values
//! never divide by zero.

use nalgebra::Vector3;

use super::{VofError, VofMoments};

/// Parameter along the edge `a -> b` where the interpolant crosses zero.
/// Requires a strict sign change between `da` and `db`.
#[inline]
fn crossing(da: f64, db: f64) -> f64 {
    da / (da - db)
}

/// Indices with negative value first (count returned); the rest fill the
/// tail in arbitrary order.
fn partition_signs<const N: usize>(values: &[f64]) -> ([usize; N], usize) {
    let mut idx = [0usize; N];
    let mut n_neg = 0;
    let mut tail = N;
    for i in 0..N {
        if values[i] < 0.0 {
            idx[n_neg] = i;
            n_neg += 1;
        } else {
            tail -= 1;
            idx[tail] = i;
        }
    }
    (idx, n_neg)
}

#[inline]
pub(super) fn triangle_area(coords: &[Vector3<f64>]) -> f64 {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    0.5 * (e1.x * e2.y - e1.y * e2.x).abs()
}

#[inline]
pub(super) fn tetra_volume(coords: &[Vector3<f64>]) -> f64 {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    let e3 = coords[3] - coords[0];
    e1.dot(&e2.cross(&e3)).abs() / 6.0
}

#[inline]
fn tet_measure(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, d: Vector3<f64>) -> f64 {
    (b - a).dot(&(c - a).cross(&(d - a))).abs() / 6.0
}

/// In-plane gradient of the interpolant on a triangle with edge matrix
/// determinant `det` (twice the signed area).
#[inline]
fn gradient_2d(e1: Vector3<f64>, e2: Vector3<f64>, det: f64, values: &[f64]) -> Vector3<f64> {
    let b1 = values[1] - values[0];
    let b2 = values[2] - values[0];
    Vector3::new(
        (b1 * e2.y - b2 * e1.y) / det,
        (b2 * e1.x - b1 * e2.x) / det,
        0.0,
    )
}

/// Gradient of the interpolant on a tetrahedron with edge-matrix
/// determinant `det` (six times the signed volume).
#[inline]
fn gradient_3d(
    e1: Vector3<f64>,
    e2: Vector3<f64>,
    e3: Vector3<f64>,
    det: f64,
    values: &[f64],
) -> Vector3<f64> {
    let b1 = values[1] - values[0];
    let b2 = values[2] - values[0];
    let b3 = values[3] - values[0];
    (e2.cross(&e3) * b1 + e3.cross(&e1) * b2 + e1.cross(&e2) * b3) / det
}

/// Segment rule: the negative sub-length, and one crossing weighted by the
/// inverse slope.
pub fn vof_segment(coords: &[Vector3<f64>], values: &[f64]) -> Result<VofMoments, VofError> {
    let length = (coords[1] - coords[0]).norm();
    if length <= 0.0 {
        return Err(VofError::DegenerateCell { measure: length });
    }
    let (d0, d1) = (values[0], values[1]);
    let (vof, interface) = match (d0 < 0.0, d1 < 0.0) {
        (false, false) => (0.0, 0.0),
        (true, true) => (1.0, 0.0),
        (true, false) => (crossing(d0, d1), length / (d1 - d0).abs()),
        (false, true) => (1.0 - crossing(d0, d1), length / (d1 - d0).abs()),
    };
    Ok(VofMoments {
        vof,
        interface,
        measure: length,
    })
}

/// Triangle rule: a corner sub-triangle on whichever side holds one vertex.
pub fn vof_triangle(coords: &[Vector3<f64>], values: &[f64]) -> Result<VofMoments, VofError> {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    let det = e1.x * e2.y - e1.y * e2.x;
    let measure = 0.5 * det.abs();
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    let (idx, n_neg) = partition_signs::<3>(values);
    let (vof, interface) = match n_neg {
        0 => (0.0, 0.0),
        3 => (1.0, 0.0),
        _ => {
            let (apex, left, right, lone_negative) = if n_neg == 1 {
                (idx[0], idx[1], idx[2], true)
            } else {
                (idx[2], idx[0], idx[1], false)
            };
            let tl = crossing(values[apex], values[left]);
            let tr = crossing(values[apex], values[right]);
            let ql = coords[apex] + (coords[left] - coords[apex]) * tl;
            let qr = coords[apex] + (coords[right] - coords[apex]) * tr;
            let corner = tl * tr;
            let vof = if lone_negative { corner } else { 1.0 - corner };
            let cut = (ql - qr).norm();
            let grad = gradient_2d(e1, e2, det, values);
            (vof, cut / grad.norm())
        }
    };
    Ok(VofMoments {
        vof,
        interface,
        measure,
    })
}

/// Tetrahedron rule: a corner sub-tetrahedron for a lone vertex, a wedge for
/// the two-two split.
pub fn vof_tetrahedron(coords: &[Vector3<f64>], values: &[f64]) -> Result<VofMoments, VofError> {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    let e3 = coords[3] - coords[0];
    let det = e1.dot(&e2.cross(&e3));
    let measure = det.abs() / 6.0;
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    let (idx, n_neg) = partition_signs::<4>(values);
    let (vof, interface) = match n_neg {
        0 => (0.0, 0.0),
        4 => (1.0, 0.0),
        1 | 3 => {
            let (apex, rest, lone_negative) = if n_neg == 1 {
                (idx[0], [idx[1], idx[2], idx[3]], true)
            } else {
                (idx[3], [idx[0], idx[1], idx[2]], false)
            };
            let mut t = [0.0f64; 3];
            let mut q = [Vector3::zeros(); 3];
            for (k, &j) in rest.iter().enumerate() {
                t[k] = crossing(values[apex], values[j]);
                q[k] = coords[apex] + (coords[j] - coords[apex]) * t[k];
            }
            let corner = t[0] * t[1] * t[2];
            let vof = if lone_negative { corner } else { 1.0 - corner };
            let cut = 0.5 * (q[1] - q[0]).cross(&(q[2] - q[0])).norm();
            let grad = gradient_3d(e1, e2, e3, det, values);
            (vof, cut / grad.norm())
        }
        _ => {
            let (n0, n1, p0, p1) = (idx[0], idx[1], idx[2], idx[3]);
            let cross_point = |a: usize, b: usize| {
                coords[a] + (coords[b] - coords[a]) * crossing(values[a], values[b])
            };
            let q00 = cross_point(n0, p0);
            let q01 = cross_point(n0, p1);
            let q10 = cross_point(n1, p0);
            let q11 = cross_point(n1, p1);
            // Wedge between the negative edge and the cut plane, split into
            // three tetrahedra along the prism diagonals.
            let wedge = tet_measure(coords[n0], q00, q01, coords[n1])
                + tet_measure(q00, q01, coords[n1], q10)
                + tet_measure(q01, coords[n1], q10, q11);
            let vof = (wedge / measure).clamp(0.0, 1.0);
            // The cut is the planar quadrilateral q00, q01, q11, q10.
            let cut = 0.5 * (q01 - q00).cross(&(q11 - q00)).norm()
                + 0.5 * (q11 - q00).cross(&(q10 - q00)).norm();
            let grad = gradient_3d(e1, e2, e3, det, values);
            (vof, cut / grad.norm())
        }
    };
    Ok(VofMoments {
        vof,
        interface,
        measure,
    })
}

pub(super) fn gradient_segment(
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    let e = coords[1] - coords[0];
    let len2 = e.norm_squared();
    if len2 <= 0.0 {
        return Err(VofError::DegenerateCell { measure: 0.0 });
    }
    Ok(e * ((values[1] - values[0]) / len2))
}

pub(super) fn gradient_triangle(
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    let det = e1.x * e2.y - e1.y * e2.x;
    let measure = 0.5 * det.abs();
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    Ok(gradient_2d(e1, e2, det, values))
}

pub(super) fn gradient_tetrahedron(
    coords: &[Vector3<f64>],
    values: &[f64],
) -> Result<Vector3<f64>, VofError> {
    let e1 = coords[1] - coords[0];
    let e2 = coords[2] - coords[0];
    let e3 = coords[3] - coords[0];
    let det = e1.dot(&e2.cross(&e3));
    let measure = det.abs() / 6.0;
    if measure <= 0.0 {
        return Err(VofError::DegenerateCell { measure });
    }
    Ok(gradient_3d(e1, e2, e3, det, values))
}
