use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::common::to_absolute_path;
use crate::image2text::TextRecognizer;
use crate::postprocess::{group_lines, post_process, prepare_lines, PostProcessConfig};

pub fn load_image_from_path(path: &Path) -> Result<DynamicImage> {
    let absolute = to_absolute_path(path);
    log::info!("Loading image {}", absolute.display());
    image::open(&absolute)
        .map_err(|e| anyhow::anyhow!("Failed to load image from {}: {}", path.display(), e))
}

/// Recognizes text in `image` and returns the cleaned output lines, with
/// blank lines separating groups.
pub fn process_image(
    image: &DynamicImage,
    recognizer: &impl TextRecognizer,
    config: &PostProcessConfig,
) -> Result<Vec<String>> {
    let fragments = recognizer.recognize(image).context("Text recognition failed")?;
    log::info!("Recognized {} fragments", fragments.len());
    Ok(post_process(fragments, config))
}

/// Like [`process_image`] but keeps the groups apart instead of joining them
/// with blank lines.
pub fn process_image_groups(
    image: &DynamicImage,
    recognizer: &impl TextRecognizer,
    config: &PostProcessConfig,
) -> Result<Vec<Vec<String>>> {
    let fragments = recognizer.recognize(image).context("Text recognition failed")?;
    log::info!("Recognized {} fragments", fragments.len());
    let lines = prepare_lines(fragments, config);
    Ok(group_lines(&lines, config.proximity_threshold))
}

/// Loads the image at `path` and runs [`process_image`] on it. The OCR side
/// of a [`ProcessorConfig`] is applied by building the recognizer with
/// [`ProcessorConfig::engine`].
///
/// [`ProcessorConfig`]: super::ProcessorConfig
/// [`ProcessorConfig::engine`]: super::ProcessorConfig::engine
pub fn process_image_from_path(
    path: &Path,
    recognizer: &impl TextRecognizer,
    config: &PostProcessConfig,
) -> Result<Vec<String>> {
    let image = load_image_from_path(path)?;
    process_image(&image, recognizer, config)
}
