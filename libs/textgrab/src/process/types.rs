use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::image2text::{OcrConfig, OcrEngine};
use crate::postprocess::PostProcessConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub ocr_config: OcrConfig,
    pub postprocess_config: PostProcessConfig,
}

impl ProcessorConfig {
    pub fn new(ocr_config: OcrConfig, postprocess_config: PostProcessConfig) -> Self {
        Self {
            ocr_config,
            postprocess_config,
        }
    }

    /// Recognizer configured from `ocr_config`.
    pub fn engine(&self) -> OcrEngine {
        OcrEngine::new(self.ocr_config.clone())
    }

    /// Reads a JSON config file; fields missing from the file keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
