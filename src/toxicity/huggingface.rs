// Hugging Face Inference API scorer (unitary/unbiased-toxic-roberta).
//
// The hosted model returns one score per label (toxicity, obscene, insult,
// threat, ...). We use the highest label score as the toxicity value, so a
// text that is mostly an insult still crosses the threshold even if its
// generic "toxicity" score is lower.
//
// Cold models answer with {"error": "...", "estimated_time": 20.0} instead of
// scores. That is reported as an error here and becomes a neutral score at
// the pipeline boundary.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{ToxicityResult, ToxicityScorer};

/// Default hosted endpoint for the toxicity model.
pub const DEFAULT_MODEL_URL: &str =
    "https://router.huggingface.co/hf-inference/models/unitary/unbiased-toxic-roberta";

/// Hugging Face hosted-inference toxicity scorer.
pub struct HuggingFaceScorer {
    client: Client,
    api_key: String,
    model_url: String,
}

impl HuggingFaceScorer {
    pub fn new(api_key: String, model_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model_url,
        })
    }
}

#[async_trait]
impl ToxicityScorer for HuggingFaceScorer {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn score_text(&self, text: &str) -> Result<ToxicityResult> {
        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .context("Failed to call Hugging Face inference API")?;

        // Error payloads (model loading, bad token) come back as JSON with a
        // non-2xx status, so parse first and only fall back to the status.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<InferencePayload>(&body) {
            Ok(payload) => payload.into_result(),
            Err(_) if !status.is_success() => {
                anyhow::bail!("Hugging Face API returned {}: {}", status, body)
            }
            Err(e) => Err(e).context("Failed to parse Hugging Face inference response"),
        }
    }
}

/// Turn a raw inference response into a toxicity result.
pub fn parse_inference_payload(body: &str) -> Result<ToxicityResult> {
    serde_json::from_str::<InferencePayload>(body)
        .context("Failed to parse Hugging Face inference response")?
        .into_result()
}

// --- Hugging Face request/response types ---

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The shapes the inference endpoint is known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferencePayload {
    /// Normal response: one list of label scores per input
    Batched(Vec<Vec<LabelScore>>),
    /// Some deployments drop the outer list for single inputs
    Flat(Vec<LabelScore>),
    Error {
        error: String,
        estimated_time: Option<f64>,
    },
    Loading {
        estimated_time: f64,
    },
}

impl InferencePayload {
    fn into_result(self) -> Result<ToxicityResult> {
        let scores = match self {
            InferencePayload::Batched(mut batch) => {
                if batch.is_empty() {
                    anyhow::bail!("Hugging Face returned an empty batch");
                }
                batch.swap_remove(0)
            }
            InferencePayload::Flat(scores) => scores,
            InferencePayload::Error {
                error,
                estimated_time: Some(eta),
            } => anyhow::bail!("Hugging Face model not ready ({error}), retry in ~{eta:.0}s"),
            InferencePayload::Error { error, .. } => {
                anyhow::bail!("Hugging Face returned an error: {error}")
            }
            InferencePayload::Loading { estimated_time } => {
                anyhow::bail!("Hugging Face model still loading, retry in ~{estimated_time:.0}s")
            }
        };

        scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|top| ToxicityResult {
                toxicity: top.score,
                label: Some(top.label),
            })
            .context("Hugging Face returned no label scores")
    }
}
