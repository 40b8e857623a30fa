use image::DynamicImage;

use super::types::{Fragment, OcrConfig, OcrError, RecognitionLevel, RecognitionResult};

#[cfg(target_os = "windows")]
fn engine_error(err: windows::core::Error) -> OcrError {
    OcrError::Engine(err.message().to_string())
}

#[cfg(target_os = "windows")]
fn create_engine(config: &OcrConfig) -> Result<windows::Media::Ocr::OcrEngine, OcrError> {
    use windows::{core::HSTRING, Globalization::Language, Media::Ocr::OcrEngine};

    for tag in &config.languages {
        let language = match Language::CreateLanguage(&HSTRING::from(tag.as_str())) {
            Ok(language) => language,
            Err(e) => {
                log::debug!("Skipping language {}: {}", tag, e.message());
                continue;
            }
        };
        if OcrEngine::IsLanguageSupported(&language).unwrap_or(false) {
            log::debug!("Using Windows OCR language {}", tag);
            return OcrEngine::TryCreateFromLanguage(&language).map_err(engine_error);
        }
    }

    log::debug!("No configured language is installed, using user profile languages");
    OcrEngine::TryCreateFromUserProfileLanguages().map_err(engine_error)
}

#[cfg(target_os = "windows")]
pub fn process_ocr_windows(img: &DynamicImage, config: &OcrConfig) -> Result<RecognitionResult, OcrError> {
    if config.recognition_level == RecognitionLevel::Fast || !config.language_correction {
        log::debug!("Windows OCR has a single recognition mode, level and correction settings are ignored");
    }

    use std::io::Cursor;
    use windows::{
        Graphics::Imaging::BitmapDecoder,
        Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    };

    let mut img_buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut img_buffer), image::ImageFormat::Png)
        .map_err(|err| OcrError::ImageConversion(err.to_string()))?;

    let inmem_stream = InMemoryRandomAccessStream::new().map_err(engine_error)?;
    let data_handler = DataWriter::CreateDataWriter(&inmem_stream).map_err(engine_error)?;
    data_handler.WriteBytes(&img_buffer).map_err(engine_error)?;
    data_handler.StoreAsync().and_then(|op| op.get()).map_err(engine_error)?;
    data_handler.FlushAsync().and_then(|op| op.get()).map_err(engine_error)?;
    inmem_stream.Seek(0).map_err(engine_error)?;

    let decoder_id = BitmapDecoder::PngDecoderId().map_err(engine_error)?;
    let img_decoder = BitmapDecoder::CreateWithIdAsync(decoder_id, &inmem_stream)
        .and_then(|op| op.get())
        .map_err(|err| OcrError::ImageConversion(err.message().to_string()))?;
    let soft_bitmap = img_decoder
        .GetSoftwareBitmapAsync()
        .and_then(|op| op.get())
        .map_err(|err| OcrError::ImageConversion(err.message().to_string()))?;
    let image_height = soft_bitmap.PixelHeight().map_err(engine_error)? as f64;

    let text_engine = create_engine(config)?;
    let recognized = text_engine
        .RecognizeAsync(&soft_bitmap)
        .and_then(|op| op.get())
        .map_err(engine_error)?;

    let lines = recognized.Lines().map_err(engine_error)?;
    let mut fragments = Vec::new();
    for line in &lines {
        let text = line.Text().map_err(engine_error)?.to_string();
        let top = line
            .Words()
            .map_err(engine_error)?
            .into_iter()
            .filter_map(|word| word.BoundingRect().ok())
            .map(|rect| rect.Y as f64)
            .fold(f64::INFINITY, f64::min);
        let top = if top.is_finite() { top } else { 0.0 };
        fragments.push(Fragment::from_pixel_top(text, top, image_height));
    }

    Ok(fragments)
}
