//! Structured mesh generators for tests, benches, and demos.

use nalgebra::Vector3;

use super::types::{Cell, CellTopology, Mesh};

/// Uniform segment mesh on `[0, 1]` with `n` cells.
pub fn line_mesh(n: usize) -> Mesh {
    let n = n.max(1);
    let h = 1.0 / (n as f64);
    let vertices = (0..=n)
        .map(|i| Vector3::new(i as f64 * h, 0.0, 0.0))
        .collect();
    let cells = (0..n)
        .map(|i| Cell::new(CellTopology::Segment, vec![i, i + 1]))
        .collect();
    Mesh::from_parts(1, vertices, cells)
}

/// Uniform quadrilateral grid on the unit square, `nx` by `ny` cells.
///
/// Vertices are row-major from the origin; each cell cycles its corners
/// counterclockwise starting at the lower-left one.
pub fn quad_grid(nx: usize, ny: usize) -> Mesh {
    let nx = nx.max(1);
    let ny = ny.max(1);
    let hx = 1.0 / (nx as f64);
    let hy = 1.0 / (ny as f64);
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(Vector3::new(i as f64 * hx, j as f64 * hy, 0.0));
        }
    }
    let vid = |i: usize, j: usize| j * (nx + 1) + i;
    let mut cells = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cells.push(Cell::new(
                CellTopology::Quadrilateral,
                vec![vid(i, j), vid(i + 1, j), vid(i + 1, j + 1), vid(i, j + 1)],
            ));
        }
    }
    Mesh::from_parts(2, vertices, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_mesh_counts_and_spacing() {
        let mesh = line_mesh(4);
        assert_eq!(mesh.dim(), 1);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.cell_count(), 4);
        assert!((mesh.cell_center(2).x - 0.625).abs() < 1e-15);
    }

    #[test]
    fn quad_grid_counts_and_centers() {
        let mesh = quad_grid(10, 10);
        assert_eq!(mesh.dim(), 2);
        assert_eq!(mesh.vertex_count(), 121);
        assert_eq!(mesh.cell_count(), 100);
        let c = mesh.cell_center(0);
        assert!((c.x - 0.05).abs() < 1e-15 && (c.y - 0.05).abs() < 1e-15);
        // Interior cell shares a vertex with its eight surrounding cells.
        assert_eq!(mesh.neighbor_cells(11).len(), 8);
    }
}
