use std::{fs, path::Path};

use anyhow::{bail, Context};
use skip_icons::{chunks::iter_chunks, decoder::SIGNATURE, Pixel, PNG};

fn main() -> anyhow::Result<()> {
    let mut args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().is_some_and(|arg| arg == "-v") {
        args.remove(0);
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .parse_default_env()
        .init();
    if args.is_empty() {
        bail!("Usage: inspect-icon [-v] <icon.png>...");
    }

    let reports = args
        .iter()
        .map(|file_name| inspect(Path::new(file_name)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn inspect(file_name: &Path) -> anyhow::Result<serde_json::Value> {
    let input =
        fs::read(file_name).with_context(|| format!("Failed to read {}", file_name.display()))?;
    let image =
        PNG::decode(&input).with_context(|| format!("Failed to decode {}", file_name.display()))?;
    log::info!("Decoded {}", file_name.display());

    let chunks = iter_chunks(&input[SIGNATURE.len()..])
        .map(|chunk| {
            chunk.map(|chunk| {
                serde_json::json!({
                    "type": String::from_utf8_lossy(chunk.chunk_type()),
                    "length": chunk.payload_len(),
                })
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let (right, bottom) = (
        image.width().saturating_sub(1),
        image.height().saturating_sub(1),
    );
    let corners: Vec<_> = [(0, 0), (right, 0), (0, bottom), (right, bottom)]
        .into_iter()
        .filter_map(|(x, y)| image.pixel(x, y))
        .map(hex_color)
        .collect();

    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    Ok(serde_json::json!({
        "file": file_name.display().to_string(),
        "inspected_at": now,
        "width": image.width(),
        "height": image.height(),
        "chunks": chunks,
        "corners": corners,
    }))
}

fn hex_color(pixel: Pixel) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        pixel.red, pixel.green, pixel.blue, pixel.alpha
    )
}
