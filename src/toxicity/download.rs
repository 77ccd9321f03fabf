// Model download helper for the local ONNX scorer.
//
// Files are stored in the platform data directory
// (~/.local/share/bleep/models/ on Linux) unless BLEEP_MODEL_DIR says
// otherwise. Existing files are never re-downloaded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const HF_REPO_URL: &str = "https://huggingface.co/protectai/unbiased-toxic-roberta-onnx/resolve/main";

pub const MODEL_FILE: &str = "model_quantized.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Default directory for model files.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bleep")
        .join("models")
}

/// True if both model files are present in `dir`.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join(MODEL_FILE).exists() && dir.join(TOKENIZER_FILE).exists()
}

/// Download the toxicity model and tokenizer into `dir`.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let client = reqwest::Client::new();

    for (file, large) in [(TOKENIZER_FILE, false), (MODEL_FILE, true)] {
        let dest = dir.join(file);
        if dest.exists() {
            info!(file, "Model file already exists, skipping");
            println!("  {file} (already exists)");
            continue;
        }

        println!("  Downloading {file}...");
        let url = format!("{HF_REPO_URL}/{file}");
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to download {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with status {}: {}", response.status(), url);
        }

        let progress = large.then(|| progress_bar(response.content_length()));

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        std::fs::write(&dest, &bytes)
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        if let Some(pb) = progress {
            pb.set_position(bytes.len() as u64);
            pb.finish_and_clear();
        }

        info!(%url, dest = %dest.display(), "Downloaded model file");
    }

    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            if let Ok(style) =
                ProgressStyle::default_bar().template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        }
        None => ProgressBar::new_spinner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_bleep() {
        let dir = default_model_dir();
        assert!(dir.ends_with("bleep/models"));
    }

    #[test]
    fn test_missing_files_not_present() {
        assert!(!model_files_present(Path::new("/nonexistent/bleep-models")));
    }
}
