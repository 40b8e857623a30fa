use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use textgrab::common::init_logger_exe;
use textgrab::image2text::{is_available, OcrError, OcrModel, RecognitionLevel};
use textgrab::process::{load_image_from_path, process_image, process_image_groups, ProcessorConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Print the text found in an image, without UI noise", long_about = None)]
struct Cli {
    #[arg(help = "input image (png, jpeg, gif, webp, tiff, bmp, etc)")]
    image: PathBuf,
    #[arg(long, help = "OCR engine: default, native or tesseract")]
    model: Option<String>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Recognition languages in priority order, e.g. zh-Hant,en-US"
    )]
    languages: Option<Vec<String>>,
    #[arg(long, help = "Favor speed over accuracy", default_value_t = false)]
    fast: bool,
    #[arg(long, help = "Disable language correction", default_value_t = false)]
    no_language_correction: bool,
    #[arg(long, help = "JSON config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Vertical gap (fraction of image height) that starts a new block")]
    threshold: Option<f64>,
    #[arg(long, help = "Minimum characters for a line to be kept")]
    min_chars: Option<usize>,
    #[arg(long = "deny", help = "Extra pattern marking a line as UI noise (repeatable)")]
    deny: Vec<String>,
    #[arg(long, help = "Start from an empty denylist", default_value_t = false)]
    no_denylist: bool,
    #[arg(long, help = "Keep only lines that look like messages or prose", default_value_t = false)]
    strict: bool,
    #[arg(long, help = "Print blocks as a JSON array", default_value_t = false)]
    json: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "More logging (repeatable)")]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Defaults, then the config file, then flags.
    fn processor_config(&self) -> Result<ProcessorConfig> {
        let mut config = match &self.config {
            Some(path) => ProcessorConfig::from_path(path)?,
            None => ProcessorConfig::default(),
        };

        let ocr = &mut config.ocr_config;
        if let Some(model) = &self.model {
            ocr.ocr_model = OcrModel::from(model.as_str());
        }
        if let Some(languages) = &self.languages {
            ocr.languages = languages
                .iter()
                .map(|lang| lang.trim().to_string())
                .filter(|lang| !lang.is_empty())
                .collect();
        }
        if self.fast {
            ocr.recognition_level = RecognitionLevel::Fast;
        }
        if self.no_language_correction {
            ocr.language_correction = false;
        }

        let post = &mut config.postprocess_config;
        if let Some(threshold) = self.threshold {
            anyhow::ensure!(
                threshold.is_finite() && threshold >= 0.0,
                "--threshold must be a non-negative number, got {}",
                threshold
            );
            post.proximity_threshold = threshold;
        }
        if let Some(min_chars) = self.min_chars {
            post.min_chars = min_chars;
        }
        if self.no_denylist {
            post.denylist.clear();
        }
        post.denylist.extend(self.deny.iter().cloned());
        if self.strict {
            post.strict = true;
        }

        Ok(config)
    }
}

/// Writes one line per entry; empty entries become the blank separators.
fn write_lines(out: &mut impl Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

fn write_groups_json(out: &mut impl Write, groups: &[Vec<String>]) -> Result<()> {
    let json = serde_json::to_string_pretty(groups).context("Failed to serialize output")?;
    writeln!(out, "{}", json)?;
    out.flush()?;
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.processor_config()?;
    log::debug!("Using config {:?}", config);

    let image = load_image_from_path(&cli.image)?;

    let engine = config.engine();
    if !is_available(engine.config()) {
        return Err(OcrError::Unavailable(engine.config().ocr_model).into());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let groups = process_image_groups(&image, &engine, &config.postprocess_config)?;
        write_groups_json(&mut out, &groups)?;
    } else {
        let lines = process_image(&image, &engine, &config.postprocess_config)?;
        log::info!("Printing {} lines", lines.len());
        write_lines(&mut out, &lines)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger_exe(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use textgrab::image2text::{Fragment, RecognitionResult, TextRecognizer};
    use textgrab::postprocess::{PostProcessConfig, DEFAULT_DENYLIST};

    struct FixedRecognizer(RecognitionResult);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<RecognitionResult, OcrError> {
            Ok(self.0.clone())
        }
    }

    fn screen() -> FixedRecognizer {
        FixedRecognizer(vec![
            Fragment::new("Second block", 0.6),
            Fragment::new("import (", 0.55),
            Fragment::new("Title", 0.1),
            Fragment::new("Subtitle", 0.13),
        ])
    }

    #[test]
    fn test_stdout_has_one_line_per_entry_and_blank_separators() -> Result<()> {
        let lines = process_image(&DynamicImage::new_rgb8(4, 4), &screen(), &PostProcessConfig::default())?;

        let mut out = Vec::new();
        write_lines(&mut out, &lines)?;

        assert_eq!(String::from_utf8(out)?, "Title\nSubtitle\n\nSecond block\n");
        Ok(())
    }

    #[test]
    fn test_empty_result_writes_nothing() -> Result<()> {
        let lines = process_image(
            &DynamicImage::new_rgb8(4, 4),
            &FixedRecognizer(Vec::new()),
            &PostProcessConfig::default(),
        )?;

        let mut out = Vec::new();
        write_lines(&mut out, &lines)?;

        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_json_output_keeps_groups() -> Result<()> {
        let groups =
            process_image_groups(&DynamicImage::new_rgb8(4, 4), &screen(), &PostProcessConfig::default())?;

        let mut out = Vec::new();
        write_groups_json(&mut out, &groups)?;

        let parsed: Vec<Vec<String>> = serde_json::from_slice(&out)?;
        assert_eq!(parsed, vec![vec!["Title", "Subtitle"], vec!["Second block"]]);
        Ok(())
    }

    #[test]
    fn test_missing_image_argument_is_rejected() {
        let err = Cli::try_parse_from(["textgrab"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults_without_flags() -> Result<()> {
        let cli = Cli::try_parse_from(["textgrab", "shot.png"])?;
        assert_eq!(cli.processor_config()?, ProcessorConfig::default());
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        Ok(())
    }

    #[test]
    fn test_flags_override_config() -> Result<()> {
        let cli = Cli::try_parse_from([
            "textgrab",
            "shot.png",
            "--model",
            "tesseract",
            "--languages",
            "en-US, ja",
            "--fast",
            "--no-language-correction",
            "--threshold",
            "0.1",
            "--min-chars",
            "3",
            "--deny",
            "Inbox",
            "--strict",
            "-vv",
        ])?;

        let config = cli.processor_config()?;

        assert_eq!(config.ocr_config.ocr_model, OcrModel::Tesseract);
        assert_eq!(config.ocr_config.languages, vec!["en-US", "ja"]);
        assert_eq!(config.ocr_config.recognition_level, RecognitionLevel::Fast);
        assert!(!config.ocr_config.language_correction);
        assert_eq!(config.postprocess_config.proximity_threshold, 0.1);
        assert_eq!(config.postprocess_config.min_chars, 3);
        assert_eq!(config.postprocess_config.denylist.len(), DEFAULT_DENYLIST.len() + 1);
        assert_eq!(config.postprocess_config.denylist.last().map(String::as_str), Some("Inbox"));
        assert!(config.postprocess_config.strict);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        Ok(())
    }

    #[test]
    fn test_no_denylist_keeps_only_extra_patterns() -> Result<()> {
        let cli = Cli::try_parse_from(["textgrab", "shot.png", "--no-denylist", "--deny", "Inbox"])?;
        let config = cli.processor_config()?;
        assert_eq!(config.postprocess_config.denylist, vec!["Inbox".to_string()]);
        Ok(())
    }

    #[test]
    fn test_config_file_then_flags() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("textgrab.json");
        std::fs::write(
            &path,
            r#"{"postprocess_config": {"proximity_threshold": 0.2, "min_chars": 4}}"#,
        )?;

        let cli = Cli::try_parse_from([
            "textgrab",
            "shot.png",
            "--config",
            path.to_str().unwrap(),
            "--min-chars",
            "1",
        ])?;
        let config = cli.processor_config()?;

        assert_eq!(config.postprocess_config.proximity_threshold, 0.2);
        assert_eq!(config.postprocess_config.min_chars, 1);
        Ok(())
    }

    #[test]
    fn test_negative_threshold_is_rejected() -> Result<()> {
        let cli = Cli::try_parse_from(["textgrab", "shot.png", "--threshold=-1"])?;
        assert!(cli.processor_config().is_err());
        Ok(())
    }
}
