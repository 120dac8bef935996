//! Mesh export for inspection outside the viewer

use std::fmt;
use std::io::{self, Write};

use super::types::Mesh;

/// Write a mesh as Wavefront OBJ
///
/// Emits one `v` and one `vt` line per vertex and one `f a/a b/b c/c` line per
/// triangle. OBJ indices are 1-based and position/texcoord indices are shared.
/// OBJ puts `vt` 0 at the bottom of the image, so `v` is flipped on the way out.
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "# globe sphere: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;

    for [x, y, z] in &mesh.vertices {
        writeln!(writer, "v {x} {y} {z}")?;
    }

    for [u, v] in &mesh.texcoords {
        writeln!(writer, "vt {u} {}", 1.0 - v)?;
    }

    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }

    writer.flush()
}

/// Human-readable listing of every vertex, index triple and texcoord
///
/// ```
/// use globe_core::procedural::{MeshDump, SphereSpec, generate};
///
/// let mesh = generate(&SphereSpec::centered(1.0, 2, 3)).unwrap();
/// let listing = MeshDump(&mesh).to_string();
/// assert!(listing.starts_with("vertices (12)"));
/// ```
pub struct MeshDump<'a>(pub &'a Mesh);

impl fmt::Display for MeshDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.0;

        writeln!(f, "vertices ({})", mesh.vertex_count())?;
        for (i, [x, y, z]) in mesh.vertices.iter().enumerate() {
            writeln!(f, "  {i:>5}: ({x:>9.5}, {y:>9.5}, {z:>9.5})")?;
        }

        writeln!(f, "indices ({})", mesh.indices.len())?;
        for (i, [a, b, c]) in mesh.triangles().enumerate() {
            writeln!(f, "  {i:>5}: {a} {b} {c}")?;
        }

        writeln!(f, "texcoords ({})", mesh.texcoords.len())?;
        for (i, [u, v]) in mesh.texcoords.iter().enumerate() {
            writeln!(f, "  {i:>5}: ({u:.5}, {v:.5})")?;
        }

        Ok(())
    }
}
