use image::DynamicImage;
use rusty_tesseract::{Args, DataOutput, Image};
use std::collections::HashMap;

use super::types::{Fragment, OcrConfig, OcrError, RecognitionResult};

pub fn perform_ocr_tesseract(
    image: &DynamicImage,
    config: &OcrConfig
) -> Result<RecognitionResult, OcrError> {
    if !config.language_correction {
        log::debug!("Tesseract has no language correction switch, ignoring it");
    }

    let args = Args {
        lang: tesseract_languages(&config.languages),
        config_variables: HashMap::from([("tessedit_create_tsv".into(), "1".into())]),
        dpi: Some(config.dpi.unwrap_or(OcrConfig::get_default_dpi(config.recognition_level)) as i32),
        psm: Some(config.psm.unwrap_or(OcrConfig::get_default_psm()) as i32),
        oem: Some(config.oem.unwrap_or(OcrConfig::get_default_oem()) as i32)
    };

    let ocr_image = Image::from_dynamic_image(image)
        .map_err(|e| OcrError::ImageConversion(e.to_string()))?;

    let data_output = rusty_tesseract::image_to_data(&ocr_image, &args)
        .map_err(|e| OcrError::Engine(e.to_string()))?;

    Ok(data_output_to_fragments(&data_output, image.height()))
}

pub fn tesseract_available() -> bool {
    match rusty_tesseract::get_tesseract_version() {
        Ok(version) => {
            log::debug!("Found tesseract {}", version.trim());
            true
        }
        Err(e) => {
            log::debug!("Tesseract not available: {}", e);
            false
        }
    }
}

/// Maps BCP-47 tags to tesseract traineddata names, joined with `+`.
fn tesseract_languages(languages: &[String]) -> String {
    let mut codes: Vec<String> = Vec::new();
    for tag in languages {
        let code = match tag.as_str() {
            "zh-Hant" | "zh-TW" | "zh-HK" => "chi_tra".to_string(),
            "zh-Hans" | "zh-CN" | "zh" => "chi_sim".to_string(),
            "ja" | "ja-JP" => "jpn".to_string(),
            "ko" | "ko-KR" => "kor".to_string(),
            "fr" | "fr-FR" => "fra".to_string(),
            "de" | "de-DE" => "deu".to_string(),
            "es" | "es-ES" => "spa".to_string(),
            other if other.starts_with("en") => "eng".to_string(),
            other => other.split('-').next().unwrap_or(other).to_string(),
        };
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.is_empty() {
        "eng".to_string()
    } else {
        codes.join("+")
    }
}

struct WordBox<'a> {
    block: i32,
    paragraph: i32,
    line: i32,
    top: i32,
    text: &'a str,
}

fn data_output_to_fragments(data_output: &DataOutput, image_height: u32) -> RecognitionResult {
    let words = data_output.data.iter().map(|word| WordBox {
        block: word.block_num,
        paragraph: word.par_num,
        line: word.line_num,
        top: word.top,
        text: &word.text,
    });
    words_to_fragments(words, image_height)
}

/// Tesseract reports words; one fragment is emitted per text line, positioned
/// at the topmost word of that line.
fn words_to_fragments<'a>(
    words: impl Iterator<Item = WordBox<'a>>,
    image_height: u32,
) -> RecognitionResult {
    let mut fragments = Vec::new();
    let mut current_key: Option<(i32, i32, i32)> = None;
    let mut current_words: Vec<&str> = Vec::new();
    let mut current_top = i32::MAX;

    let mut flush = |words: &mut Vec<&str>, top: i32| {
        if !words.is_empty() {
            fragments.push(Fragment::from_pixel_top(words.join(" "), top as f64, image_height as f64));
            words.clear();
        }
    };

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }

        let key = (word.block, word.paragraph, word.line);
        if current_key != Some(key) {
            flush(&mut current_words, current_top);
            current_key = Some(key);
            current_top = i32::MAX;
        }

        current_words.push(text);
        current_top = current_top.min(word.top);
    }
    flush(&mut current_words, current_top);

    fragments
}
