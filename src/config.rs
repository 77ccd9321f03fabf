use std::env;
#[cfg(feature = "onnx")]
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::phrases::groq;
use crate::pipeline::moderation::{ModerationPolicy, DEFAULT_THRESHOLD, DEFAULT_TIMEOUT};
use crate::toxicity::huggingface;

/// Which toxicity scoring backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerBackend {
    /// Hugging Face hosted inference (default), requires HF_API_KEY
    HuggingFace,
    /// Google Perspective API, requires PERSPECTIVE_API_KEY, 1 QPS limit
    Perspective,
    /// Local ONNX model, requires the `onnx` feature and downloaded model files
    Onnx,
    /// No toxicity scoring; only phrase extraction runs
    Disabled,
}

impl ScorerBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "huggingface" | "hf" => Ok(ScorerBackend::HuggingFace),
            "perspective" => Ok(ScorerBackend::Perspective),
            "onnx" => Ok(ScorerBackend::Onnx),
            "none" | "off" => Ok(ScorerBackend::Disabled),
            other => anyhow::bail!(
                "Unknown BLEEP_SCORER value {other:?}. Use huggingface, perspective, onnx or none."
            ),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Deployment label shown by `bleep status` (APP_ENV)
    pub app_env: String,
    /// Default log level when RUST_LOG is unset (LOG_LEVEL)
    pub log_level: String,
    pub scorer_backend: ScorerBackend,
    pub hf_api_key: String,
    pub hf_model_url: String,
    pub perspective_api_key: String,
    /// Directory containing the ONNX model files
    #[cfg(feature = "onnx")]
    pub model_dir: PathBuf,
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    pub toxicity_threshold: f64,
    pub detector_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing API keys are not an error here: the matching detector is
    /// simply left out and moderation degrades around it.
    pub fn load() -> Result<Self> {
        let scorer_backend = ScorerBackend::parse(&env::var("BLEEP_SCORER").unwrap_or_default())?;

        let toxicity_threshold = match env::var("TOXICITY_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        let detector_timeout = match env::var("BLEEP_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            scorer_backend,
            hf_api_key: env::var("HF_API_KEY").unwrap_or_default(),
            hf_model_url: env::var("HF_MODEL_URL")
                .unwrap_or_else(|_| huggingface::DEFAULT_MODEL_URL.to_string()),
            perspective_api_key: env::var("PERSPECTIVE_API_KEY").unwrap_or_default(),
            #[cfg(feature = "onnx")]
            model_dir: env::var("BLEEP_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| crate::toxicity::download::default_model_dir()),
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| groq::DEFAULT_API_URL.to_string()),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| groq::DEFAULT_MODEL.to_string()),
            toxicity_threshold,
            detector_timeout,
        })
    }

    /// Threshold and timeout for the moderation pipeline.
    pub fn policy(&self) -> ModerationPolicy {
        ModerationPolicy {
            toxicity_threshold: self.toxicity_threshold,
            detector_timeout: self.detector_timeout,
        }
    }

    /// Check that the chosen scorer backend has what it needs.
    ///
    /// The service still runs when this fails; callers use it to warn.
    pub fn require_scorer(&self) -> Result<()> {
        match self.scorer_backend {
            ScorerBackend::HuggingFace if self.hf_api_key.is_empty() => anyhow::bail!(
                "HF_API_KEY not set. Toxicity scoring is disabled.\n\
                 Add it to your .env file or set BLEEP_SCORER to another backend."
            ),
            ScorerBackend::Perspective if self.perspective_api_key.is_empty() => anyhow::bail!(
                "PERSPECTIVE_API_KEY not set. Toxicity scoring is disabled.\n\
                 Add it to your .env file or set BLEEP_SCORER to another backend."
            ),
            #[cfg(feature = "onnx")]
            ScorerBackend::Onnx if !crate::toxicity::download::model_files_present(&self.model_dir) => {
                anyhow::bail!(
                    "ONNX model files not found in {}\n\
                     Run `bleep download-model` to download them.",
                    self.model_dir.display()
                )
            }
            #[cfg(not(feature = "onnx"))]
            ScorerBackend::Onnx => anyhow::bail!(
                "BLEEP_SCORER=onnx needs a build with the `onnx` feature.\n\
                 Rebuild with `cargo build --features onnx`."
            ),
            _ => Ok(()),
        }
    }

    /// Check that the phrase extractor is configured.
    pub fn require_extractor(&self) -> Result<()> {
        if self.groq_api_key.is_empty() {
            anyhow::bail!(
                "GROQ_API_KEY not set. Phrase extraction is disabled, so only whole-text\n\
                 fallback masking is available. Add it to your .env file."
            );
        }
        Ok(())
    }
}

fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("TOXICITY_THRESHOLD must be a number, got {raw:?}"))?;
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("TOXICITY_THRESHOLD must be between 0 and 1, got {value}");
    }
    Ok(value)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("BLEEP_TIMEOUT_SECS must be a number, got {raw:?}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        anyhow::bail!("BLEEP_TIMEOUT_SECS must be positive, got {secs}");
    }
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("BLEEP_TIMEOUT_SECS is out of range, got {secs}"))
}
