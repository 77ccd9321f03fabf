// Local ONNX scorer running unbiased-toxic-roberta on the CPU.
//
// Same model family the Hugging Face backend calls remotely, so thresholds
// tuned for one carry over to the other. Useful when the service must run
// without outbound network access. Enabled with the `onnx` feature.
//
// Model: protectai/unbiased-toxic-roberta-onnx (quantized)
// Output: 7 label logits, squashed with a sigmoid; toxicity is the max.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::traits::{ToxicityResult, ToxicityScorer};

/// Output labels in model order.
const LABELS: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "identity_attack",
    "insult",
    "threat",
    "sexual_explicit",
];

/// RoBERTa's token id limit; longer complaints are truncated.
const MAX_TOKENS: usize = 512;

pub struct OnnxToxicityScorer {
    // Session::run needs &mut, and spawn_blocking needs 'static handles
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxToxicityScorer {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Run `bleep download-model` first if the files are missing.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                anyhow::bail!(
                    "Model file not found: {}\nRun `bleep download-model` to download it.",
                    path.display()
                );
            }
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        debug!("Loaded ONNX toxicity model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl ToxicityScorer for OnnxToxicityScorer {
    fn name(&self) -> &'static str {
        "onnx"
    }

    async fn score_text(&self, text: &str) -> Result<ToxicityResult> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        // Tokenization and inference are CPU-bound; keep them off the runtime
        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let seq_len = encoding.get_ids().len().min(MAX_TOKENS);
            let input_ids: Vec<i64> = encoding.get_ids()[..seq_len]
                .iter()
                .map(|&id| id as i64)
                .collect();
            let attention_mask: Vec<i64> = encoding.get_attention_mask()[..seq_len]
                .iter()
                .map(|&m| m as i64)
                .collect();

            let shape = [1_i64, seq_len as i64];
            let input_ids = Tensor::from_array((shape, input_ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask = Tensor::from_array((shape, attention_mask))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids,
                        "attention_mask" => attention_mask
                    })
                    .context("ONNX inference failed")?;

                let (_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            strongest_label(&logits).context("Model produced no outputs")
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Squash logits to probabilities and keep the highest label.
fn strongest_label(logits: &[f32]) -> Option<ToxicityResult> {
    logits
        .iter()
        .zip(LABELS)
        .map(|(&logit, label)| (sigmoid(logit as f64), label))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(toxicity, label)| ToxicityResult {
            toxicity,
            label: Some(label.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-10);
        for x in [0.5, 2.0, 5.0] {
            assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_strongest_label() {
        // insult has the largest logit
        let logits = [0.1_f32, -3.0, -1.0, -2.0, 2.5, -4.0, -5.0];
        let result = strongest_label(&logits).unwrap();
        assert_eq!(result.label.as_deref(), Some("insult"));
        assert!((result.toxicity - sigmoid(2.5)).abs() < 1e-6);
    }

    #[test]
    fn test_no_logits() {
        assert!(strongest_label(&[]).is_none());
    }
}
