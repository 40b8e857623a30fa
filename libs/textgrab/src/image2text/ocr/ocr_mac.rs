#[cfg(target_os = "macos")]
use cidre::{
    arc,
    cv::{PixelBuf, PixelFormat},
    ns,
    vn::{self, ImageRequestHandler, RecognizeTextRequest},
};
use image::{DynamicImage, GenericImageView};
use std::{ffi::c_void, ptr::null_mut};

use super::types::{Fragment, OcrConfig, OcrError, RecognitionLevel, RecognitionResult};

#[no_mangle]
#[cfg(target_os = "macos")]
extern "C" fn release_callback(_refcon: *mut c_void, _data_ptr: *const *const c_void) {
    // The luma buffer is owned by the caller and outlives the pixel buffer.
}

#[cfg(target_os = "macos")]
fn configure_request(request: &mut RecognizeTextRequest, config: &OcrConfig) {
    let level = match config.recognition_level {
        RecognitionLevel::Accurate => vn::RequestTextRecognitionLevel::Accurate,
        RecognitionLevel::Fast => vn::RequestTextRecognitionLevel::Fast,
    };
    request.set_recognition_level(level);
    request.set_uses_lang_correction(config.language_correction);

    if config.languages.is_empty() {
        request.set_automatically_detects_lang(true);
    } else {
        let langs: Vec<arc::R<ns::String>> = config
            .languages
            .iter()
            .map(|tag| ns::String::with_str(tag))
            .collect();
        let lang_refs: Vec<&ns::String> = langs.iter().map(|lang| &**lang).collect();
        request.set_recognition_langs(&ns::Array::from_slice(&lang_refs));
    }
}

#[cfg(target_os = "macos")]
pub fn process_ocr_macosx(image: &DynamicImage, config: &OcrConfig) -> Result<RecognitionResult, OcrError> {
    cidre::objc::ar_pool(|| {
        let (width, height) = image.dimensions();
        let luma = image.grayscale().to_luma8();
        let raw_data = luma.as_raw();

        let width = usize::try_from(width)
            .map_err(|e| OcrError::ImageConversion(e.to_string()))?;
        let height = usize::try_from(height)
            .map_err(|e| OcrError::ImageConversion(e.to_string()))?;

        let mut pixel_buf_out = None;

        let pixel_buf = unsafe {
            PixelBuf::create_with_bytes_in(
                width,
                height,
                PixelFormat::ONE_COMPONENT_8,
                raw_data.as_ptr() as *mut c_void,
                width,
                release_callback,
                null_mut(),
                None,
                &mut pixel_buf_out,
                None,
            )
            .to_result_unchecked(pixel_buf_out)
        }
        .map_err(|status| OcrError::ImageConversion(format!("pixel buffer creation failed: {:?}", status)))?;

        let handler = ImageRequestHandler::with_cv_pixel_buf(&pixel_buf, None)
            .ok_or_else(|| OcrError::Engine("could not create image request handler".to_string()))?;
        let mut request = RecognizeTextRequest::new();
        configure_request(&mut request, config);

        let requests = ns::Array::<vn::Request>::from_slice(&[&request]);
        handler
            .perform(&requests)
            .map_err(|e| OcrError::Engine(e.localized_description().to_string()))?;

        let results = request.results().ok_or(OcrError::NoObservations)?;

        let mut fragments = Vec::with_capacity(results.len());
        for observation in results.iter() {
            let candidates = observation.top_candidates(1);
            if let Some(candidate) = candidates.iter().next() {
                let bounds = observation.bounding_box();
                fragments.push(Fragment::from_bottom_left(
                    candidate.string().to_string(),
                    bounds.origin.y as f64,
                ));
            }
        }

        log::debug!("Vision returned {} observations", fragments.len());
        Ok(fragments)
    })
}
