use crate::draw::bitmap::Bitmap;
use crate::draw::settings::DrawSettings;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_PREFIX: &str = "drawy";

/// Export root: the configured override, else the platform pictures directory.
pub fn export_root(settings: &DrawSettings) -> Result<PathBuf> {
    if let Some(root) = settings.export_root.as_deref() {
        return Ok(PathBuf::from(root));
    }
    dirs_next::picture_dir()
        .or_else(|| dirs_next::home_dir().map(|home| home.join("Pictures")))
        .ok_or_else(|| anyhow!("cannot determine a pictures directory"))
}

pub fn ensure_output_folder(root: &Path, subdir: &str) -> Result<PathBuf> {
    let output = root.join(subdir);
    fs::create_dir_all(&output)
        .with_context(|| format!("create export folder {}", output.display()))?;
    Ok(output)
}

pub fn timestamped_stem(now: chrono::DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M").to_string()
}

pub fn build_filename(stem: &str) -> String {
    format!("{}_{}.png", EXPORT_FILE_PREFIX, stem)
}

/// PNG is lossless, so the 0-100 quality only picks how hard the encoder compresses.
pub fn compression_for_quality(quality: u8) -> CompressionType {
    match quality {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

pub fn write_png(bitmap: &Bitmap, path: &Path, quality: u8) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("create export file {}", path.display()))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        compression_for_quality(quality),
        FilterType::Adaptive,
    );
    encoder
        .write_image(
            bitmap.as_raw(),
            bitmap.width(),
            bitmap.height(),
            ColorType::Rgba8,
        )
        .with_context(|| format!("encode png {}", path.display()))
}

/// Writes `bitmap` as `<root>/<subdir>/drawy_<yyyyMMdd_HHmm>.png` and returns the path.
pub fn export_png(
    bitmap: &Bitmap,
    settings: &DrawSettings,
    now: chrono::DateTime<Local>,
) -> Result<PathBuf> {
    let root = export_root(settings)?;
    let folder = ensure_output_folder(&root, &settings.export_subdir)?;
    let path = folder.join(build_filename(&timestamped_stem(now)));
    write_png(bitmap, &path, settings.export_quality)?;
    tracing::info!(path = %path.display(), "drawing exported");
    Ok(path)
}
