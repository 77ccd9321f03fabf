// Google Perspective API scorer.
//
// Alternative to the Hugging Face backend. Perspective is free but limited to
// ~1 QPS, so calls go through a shared RateLimiter. The request omits
// `languages` and lets Perspective detect the language itself; attributes it
// can't score for a language are simply missing from the response.
//
// Complaint text is sensitive, so every request sets doNotStore.
//
// API docs: https://developers.perspectiveapi.com/s/about-the-api-methods

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::rate_limiter::RateLimiter;
use super::traits::{ToxicityResult, ToxicityScorer};

const ANALYZE_URL: &str = "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

/// Perspective API toxicity scorer.
pub struct PerspectiveScorer {
    client: Client,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl PerspectiveScorer {
    /// Create a new Perspective API scorer with the given API key.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            // Perspective free tier: 1 query per second
            rate_limiter: RateLimiter::new(1.0),
        })
    }
}

#[async_trait]
impl ToxicityScorer for PerspectiveScorer {
    fn name(&self) -> &'static str {
        "perspective"
    }

    async fn score_text(&self, text: &str) -> Result<ToxicityResult> {
        self.rate_limiter.acquire().await;

        let request = AnalyzeRequest {
            comment: Comment { text },
            requested_attributes: RequestedAttributes::default(),
            do_not_store: true,
        };

        let response = self
            .client
            .post(ANALYZE_URL)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .context("Failed to call Perspective API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Perspective API returned {}: {}", status, body);
        }

        let result: AnalyzeResponse = response
            .json()
            .await
            .context("Failed to parse Perspective API response")?;

        strongest_attribute(&result).context("Perspective returned no attribute scores")
    }
}

/// Pick the highest-scoring attribute, mirroring the max-label rule used for
/// the Hugging Face model.
fn strongest_attribute(response: &AnalyzeResponse) -> Option<ToxicityResult> {
    response
        .attribute_scores
        .iter()
        .max_by(|a, b| a.1.summary_score.value.total_cmp(&b.1.summary_score.value))
        .map(|(name, score)| ToxicityResult {
            toxicity: score.summary_score.value,
            label: Some(name.to_lowercase()),
        })
}

// --- Perspective API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    comment: Comment<'a>,
    requested_attributes: RequestedAttributes,
    do_not_store: bool,
}

#[derive(Serialize)]
struct Comment<'a> {
    text: &'a str,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RequestedAttributes {
    toxicity: AttributeConfig,
    severe_toxicity: AttributeConfig,
    identity_attack: AttributeConfig,
    insult: AttributeConfig,
    profanity: AttributeConfig,
    threat: AttributeConfig,
}

#[derive(Serialize, Default)]
struct AttributeConfig {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Deserialize)]
struct SummaryScore {
    value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strongest_attribute_wins() {
        let json = r#"{"attributeScores": {
            "TOXICITY": {"summaryScore": {"value": 0.4}},
            "INSULT": {"summaryScore": {"value": 0.9}}
        }}"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let result = strongest_attribute(&response).unwrap();
        assert!((result.toxicity - 0.9).abs() < 1e-10);
        assert_eq!(result.label.as_deref(), Some("insult"));
    }

    #[test]
    fn test_no_attributes() {
        let response: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(strongest_attribute(&response).is_none());
    }

    #[test]
    fn test_request_shape() {
        let request = AnalyzeRequest {
            comment: Comment { text: "hello" },
            requested_attributes: RequestedAttributes::default(),
            do_not_store: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["comment"]["text"], "hello");
        assert_eq!(json["doNotStore"], true);
        assert!(json["requestedAttributes"]["SEVERE_TOXICITY"].is_object());
    }
}
