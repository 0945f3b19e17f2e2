//! Writing generated planets to disk: OBJ meshes and PNG textures.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use icoplanet_mesh::Mesh;
use icoplanet_surface::PixelBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::DemoError;

/// Write `mesh` as Wavefront OBJ.
///
/// Vertex colors, when present, are appended to the `v` lines as `r g b`.
/// Faces reference position, uv and normal with the same 1-based index.
pub fn write_obj(mesh: &Mesh, path: &Path) -> Result<(), DemoError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj_to(mesh, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_obj_to(mesh: &Mesh, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "# icoplanet: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    for (i, p) in mesh.positions.iter().enumerate() {
        match mesh.colors.as_ref().and_then(|c| c.get(i)) {
            Some([r, g, b]) => writeln!(out, "v {} {} {} {r} {g} {b}", p.x, p.y, p.z)?,
            None => writeln!(out, "v {} {} {}", p.x, p.y, p.z)?,
        }
    }
    for uv in &mesh.uvs {
        writeln!(out, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in &mesh.triangles {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    Ok(())
}

/// Write `buffer` as an RGBA PNG.
///
/// Buffer row 0 becomes the bottom image row, so latitude increases upward.
pub fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<(), DemoError> {
    let (width, height) = buffer.dimensions();
    let row_bytes = width as usize * 4;
    let bytes = buffer.to_rgba8();
    let flipped: Vec<u8> = bytes
        .chunks_exact(row_bytes)
        .rev()
        .flatten()
        .copied()
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    PngEncoder::new(writer).write_image(&flipped, width, height, ExtendedColorType::Rgba8)?;
    Ok(())
}
