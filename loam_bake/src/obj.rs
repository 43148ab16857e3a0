use std::io::{self, Write};

use loam_terrain::SectionBuffers;

/// Write one terrain section as Wavefront OBJ.
///
/// The material weight travels as a grayscale vertex color (`v x y z r g b`).
pub fn write_section_obj<W: Write>(mut out: W, section: u32, buffers: &SectionBuffers<'_>) -> io::Result<()> {
    writeln!(out, "o terrain_section_{}", section)?;

    for (position, color) in buffers.positions.iter().zip(buffers.colors) {
        let w = color[3];
        writeln!(
            out,
            "v {} {} {} {} {} {}",
            position[0], position[1], position[2], w, w, w
        )?;
    }

    for uv in buffers.uvs {
        writeln!(out, "vt {} {}", uv[0], uv[1])?;
    }

    for normal in buffers.normals {
        writeln!(out, "vn {} {} {}", normal[0], normal[1], normal[2])?;
    }

    // OBJ indices are 1-based
    for tri in buffers.triangles.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    out.flush()
}
