use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrModel {
    Tesseract,
    Native,
    Default,
}

impl std::fmt::Display for OcrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrModel::Tesseract => write!(f, "Tesseract"),
            OcrModel::Native => write!(f, "Native"),
            OcrModel::Default => write!(f, "Default"),
        }
    }
}

impl From<&str> for OcrModel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "tesseract" => OcrModel::Tesseract,
            "native" => OcrModel::Native,
            "default" => OcrModel::Default,
            _ => OcrModel::Default,
        }
    }
}

/// Trade-off between recognition speed and accuracy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionLevel {
    #[default]
    Accurate,
    Fast,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub ocr_model: OcrModel,
    pub recognition_level: RecognitionLevel,
    pub languages: Vec<String>, // BCP-47 tags, highest priority first
    pub language_correction: bool,
    pub dpi: Option<u32>, // dots per inch
    pub psm: Option<u32>, // Page segmentation mode
    pub oem: Option<u32>, // OCR Engine Mode
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            ocr_model: OcrModel::Default,
            recognition_level: RecognitionLevel::Accurate,
            languages: Self::get_default_languages(),
            language_correction: true,
            dpi: None,
            psm: None,
            oem: None,
        }
    }
}

impl OcrConfig {
    pub fn new(ocr_model: OcrModel, recognition_level: RecognitionLevel, languages: Vec<String>) -> Self {
        Self {
            ocr_model,
            recognition_level,
            languages,
            ..Default::default()
        }
    }

    pub fn get_default_languages() -> Vec<String> {
        vec!["zh-Hant".to_string(), "zh-Hans".to_string(), "en-US".to_string()]
    }

    pub fn get_default_dpi(level: RecognitionLevel) -> u32 {
        match level {
            RecognitionLevel::Accurate => 600,
            RecognitionLevel::Fast => 300,
        }
    }

    pub fn get_default_psm() -> u32 {
        1
    }

    pub fn get_default_oem() -> u32 {
        1
    }
}

/// One unit of recognized text.
///
/// `position` is the normalized distance of the text's origin from the top
/// edge of the image: 0.0 is the top, 1.0 the bottom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub position: f64,
}

impl Fragment {
    pub fn new(text: impl Into<String>, position: f64) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }

    /// Builds a fragment from a coordinate space with its origin at the
    /// bottom-left corner and y growing upwards, as Apple Vision reports it.
    pub fn from_bottom_left(text: impl Into<String>, origin_y: f64) -> Self {
        Self::new(text, 1.0 - origin_y)
    }

    /// Builds a fragment from a pixel offset measured from the top edge.
    pub fn from_pixel_top(text: impl Into<String>, top: f64, image_height: f64) -> Self {
        let position = if image_height > 0.0 { top / image_height } else { 0.0 };
        Self::new(text, position)
    }
}

pub type RecognitionResult = Vec<Fragment>;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Image conversion failed: {0}")]
    ImageConversion(String),
    #[error("Recognition engine error: {0}")]
    Engine(String),
    #[error("OCR engine {0} is not available on this system")]
    Unavailable(OcrModel),
    #[error("Recognition engine returned no observation list")]
    NoObservations,
}
