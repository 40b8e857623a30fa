// OCR module structure
#[cfg(target_os = "macos")]
mod ocr_mac;
#[cfg(target_os = "windows")]
mod ocr_win;

mod ocr_tesseract;

mod types;
pub use types::{Fragment, OcrConfig, OcrError, OcrModel, RecognitionLevel, RecognitionResult};

use image::DynamicImage;

/// A text recognition capability: given an image, returns the recognized
/// fragments once recognition has fully completed.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<RecognitionResult, OcrError>;
}

/// Recognizer backed by the engine selected in an [`OcrConfig`].
#[derive(Clone, Debug, Default)]
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }
}

impl TextRecognizer for OcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<RecognitionResult, OcrError> {
        process_ocr(image, &self.config)
    }
}

pub fn process_ocr(img: &DynamicImage, config: &OcrConfig) -> Result<RecognitionResult, OcrError> {
    log::debug!(
        "Running {} OCR ({:?}, languages {:?}) on {}x{} image",
        config.ocr_model,
        config.recognition_level,
        config.languages,
        img.width(),
        img.height()
    );

    match config.ocr_model {
        OcrModel::Tesseract => {
            use self::ocr_tesseract::perform_ocr_tesseract;
            perform_ocr_tesseract(img, config)
        }
        OcrModel::Default | OcrModel::Native => {
            #[cfg(target_os = "macos")]
            {
                use self::ocr_mac::process_ocr_macosx;
                process_ocr_macosx(img, config)
            }
            #[cfg(target_os = "windows")]
            {
                use self::ocr_win::process_ocr_windows;
                process_ocr_windows(img, config)
            }
            #[cfg(not(any(target_os = "macos", target_os = "windows")))]
            {
                use self::ocr_tesseract::perform_ocr_tesseract;
                perform_ocr_tesseract(img, config)
            }
        }
    }
}

/// Reports whether the engine selected by `config` can run on this system.
pub fn is_available(config: &OcrConfig) -> bool {
    match config.ocr_model {
        OcrModel::Tesseract => ocr_tesseract::tesseract_available(),
        OcrModel::Default | OcrModel::Native => {
            if cfg!(any(target_os = "macos", target_os = "windows")) {
                true
            } else {
                ocr_tesseract::tesseract_available()
            }
        }
    }
}
