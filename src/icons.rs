use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::info;

use crate::{png::PNG, raster::render_icon};

/// Edge lengths of the icon set, in pixels.
pub const ICON_SIZES: [u32; 3] = [16, 48, 128];

pub fn icon_file_name(size: u32) -> String {
    format!("icon{size}.png")
}

/// The `icons` directory shipped alongside the crate sources. The path is
/// fixed at build time, so this targets running from a checkout with
/// `cargo run`; an installed binary still points at the build tree.
pub fn default_output_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("icons")
}

/// Renders and encodes one icon.
pub fn encode_icon(size: u32) -> Vec<u8> {
    PNG::from(render_icon(size)).encode()
}

/// Writes every icon of [`ICON_SIZES`] into `dir`, returning the written
/// paths in size order. `dir` must already exist; the first failed write
/// aborts the run and earlier files are left in place.
pub fn generate_icons(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(ICON_SIZES.len());
    for size in ICON_SIZES {
        let path = dir.join(icon_file_name(size));
        fs::write(&path, encode_icon(size))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}x{} icon to {}", size, size, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Generates the icon set into `dir` and reports each written file, then a
/// final completion line, to `out`.
pub fn run(dir: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    for path in generate_icons(dir)? {
        writeln!(out, "Created {}", path.display())?;
    }
    writeln!(out, "Done! Icons created successfully.")?;
    Ok(())
}
