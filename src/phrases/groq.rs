// Groq chat-completions phrase extractor.
//
// Sends the complaint to an OpenAI-compatible chat endpoint in JSON mode and
// expects back:
//
//   {"abusive_phrases": [{"phrase": "...", "lang": "...", "category": "...", "severity": "..."}]}
//
// Anything else (no choices, non-JSON content, a non-object, a missing or
// non-list `abusive_phrases`) is an error, which the fail-open boundary
// turns into "no phrases". Individual malformed items are skipped rather
// than failing the whole list.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::PhraseExtractor;
use super::PhraseHit;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const SYSTEM_PROMPT: &str = r#"You moderate citizen complaints submitted to a public grievance portal.
Complaints may be written in English, Hindi, Hinglish (Hindi in Latin script) or Odia (in Odia or Latin script).

List every abusive, profane, obscene or slur word or short phrase that appears in the complaint.
- Copy each phrase exactly as it is written in the complaint. Never translate, rewrite or paraphrase.
- Anger, criticism and strong complaints about services are NOT abusive on their own. Only report actual insults, cuss words, slurs and threats.
- If nothing is abusive, return an empty list.

Reply with exactly one JSON object and nothing else:
{"abusive_phrases": [{"phrase": "<exact text>", "lang": "en|hi|hinglish|odia|unknown", "category": "abuse|slur|sexual|threat|obscene|other", "severity": "low|medium|high"}]}"#;

/// Matches a reply wrapped in a Markdown code fence, capturing the inside.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

/// Phrase extractor backed by Groq's OpenAI-compatible API.
pub struct GroqExtractor {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GroqExtractor {
    pub fn new(api_key: String, api_url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            api_url,
            model,
        })
    }
}

#[async_trait]
impl PhraseExtractor for GroqExtractor {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn extract(&self, text: &str) -> Result<Vec<PhraseHit>> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call Groq chat completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API returned {}: {}", status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Groq chat response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Groq response has no message content")?;

        parse_phrase_payload(&content)
    }
}

/// Parse the model's reply into phrase hits.
pub fn parse_phrase_payload(content: &str) -> Result<Vec<PhraseHit>> {
    let json = strip_code_fence(content);

    let value: Value =
        serde_json::from_str(json).context("Model reply is not valid JSON")?;

    let Value::Object(mut object) = value else {
        anyhow::bail!("Model reply is not a JSON object");
    };

    let Some(Value::Array(items)) = object.remove("abusive_phrases") else {
        anyhow::bail!("Model reply has no `abusive_phrases` list");
    };

    Ok(items.iter().filter_map(phrase_hit).collect())
}

/// Read one reported item. Only a string `phrase` is required; tags that
/// aren't strings are dropped rather than discarding the phrase.
fn phrase_hit(item: &Value) -> Option<PhraseHit> {
    let phrase = item.get("phrase")?.as_str()?.to_string();
    let tag = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);

    Some(PhraseHit {
        phrase,
        lang: tag("lang"),
        category: tag("category"),
        severity: tag("severity"),
    })
}

/// Remove a surrounding ```json ... ``` fence, if there is one.
fn strip_code_fence(content: &str) -> &str {
    CODE_FENCE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map_or(content.trim(), |inner| inner.as_str())
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    response_format: ResponseFormat,
    messages: [Message<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n[]\n```\n"), "[]");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_chat_response_without_content() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert!(chat.choices[0].message.content.is_none());

        let chat: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(chat.choices.is_empty());
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            temperature: 0.0,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: "complaint",
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][1]["content"], "complaint");
        assert_eq!(json["temperature"], 0.0);
    }
}
