//! `pngshrink info` and `pngshrink preview`.

use std::path::Path;

use anyhow::{Context, Result};

use pngshrink_core::decode::{decode_file, generate_preview, read_image_info, PreviewBox};

pub fn run_info(file: &Path) -> Result<()> {
    let info = read_image_info(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = file
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!("Name:       {name}");
    println!("Dimensions: {}x{}", info.width, info.height);
    println!("Channels:   {}", info.channels);
    println!("Size:       {:.2} MB", info.file_size_mb());
    println!("Folder:     {folder}");
    Ok(())
}

pub fn run_preview(file: &Path, output: &Path, max_width: u32, max_height: u32) -> Result<()> {
    let image = decode_file(file).with_context(|| format!("failed to decode {}", file.display()))?;
    let preview = generate_preview(&image, PreviewBox::new(max_width, max_height))?;

    let rgb = preview
        .to_rgb_image()
        .context("preview buffer does not match its dimensions")?;
    rgb.save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        "Wrote {}x{} preview to {}",
        preview.width,
        preview.height,
        output.display()
    );
    Ok(())
}
