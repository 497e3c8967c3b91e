//! Debug dump of a vertex field.
//!
//! One text line per vertex: tab-separated coordinate components, then the
//! value, all in fixed-width scientific notation. A debugging aid only; the
//! format carries no compatibility guarantee.

use std::io::{self, Write};

use crate::field::{FieldLocation, ScalarField};
use crate::mesh::Mesh;

/// Write every vertex of `field` to `out`.
pub fn write_vertex_field<W: Write>(
    mesh: &Mesh,
    field: &ScalarField,
    out: &mut W,
) -> io::Result<()> {
    debug_assert_eq!(field.location(), FieldLocation::Vertices);
    for v in 0..mesh.vertex_count() {
        let p = mesh.vertex(v);
        for d in 0..mesh.dim() {
            write!(out, "{:+.16e}\t", p[d])?;
        }
        writeln!(out, "{:+.16e}", field.values()[v])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::line_mesh;

    #[test]
    fn one_line_per_vertex_with_fixed_width_columns() {
        let mesh = line_mesh(2);
        let mut field = ScalarField::vertex_field(&mesh);
        field.set(0, -0.25);
        field.set(2, 1.0);
        let mut out = Vec::new();
        write_vertex_field(&mesh, &field, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split('\t').count(), 2);
        assert!(lines[0].ends_with("-2.5000000000000000e-1"));
        assert!(lines[1].starts_with("+5.0000000000000000e-1"));
    }
}
