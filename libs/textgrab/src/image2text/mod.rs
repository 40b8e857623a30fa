mod ocr;
pub use ocr::{
    is_available, process_ocr, Fragment, OcrConfig, OcrEngine, OcrError, OcrModel,
    RecognitionLevel, RecognitionResult, TextRecognizer,
};
