//! Gemini generation and embedding client.
//!
//! All language-model and embedding traffic goes through this module:
//! - [`generate_structured`] — `generateContent` with a response schema,
//!   used by the question generator, the evaluator, and the report
//!   assembler.
//! - [`generate_text`] — plain `generateContent`, used by the query
//!   expander.
//! - [`embed_text`] / [`embed_batch`] — `embedContent` and
//!   `batchEmbedContents` for retrieval and ingestion vectors.
//!
//! Requires the `GOOGLE_API_KEY` environment variable.
//!
//! # Retry Strategy
//!
//! Transient errors are retried with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use serde_json::json;
use std::time::Duration;

use crate::config::GeminiConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Intent tag sent with embedding requests so the model can optimize the
/// vector for its role in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::RetrievalQuery => "RETRIEVAL_QUERY",
            TaskType::RetrievalDocument => "RETRIEVAL_DOCUMENT",
        }
    }
}

fn api_key() -> Result<String> {
    std::env::var("GOOGLE_API_KEY").map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY not set"))
}

fn http_client(config: &GeminiConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// POST a JSON body with retry/backoff and return the parsed response.
///
/// Retry strategy:
/// - HTTP 429 or 5xx → retry with exponential backoff
/// - HTTP 4xx (not 429) → fail immediately
/// - Network error → retry
async fn post_with_retry(
    config: &GeminiConfig,
    url: &str,
    body: &serde_json::Value,
) -> Result<serde_json::Value> {
    let client = http_client(config)?;
    let mut last_err = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s, 8s, ...
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let resp = client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await;

        match resp {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json().await?);
                }

                // Rate limited or server error — retry
                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!(
                        "Gemini API error {}: {}",
                        status,
                        body_text
                    ));
                    continue;
                }

                // Client error (not 429) — don't retry
                let body_text = response.text().await.unwrap_or_default();
                bail!("Gemini API error {}: {}", status, body_text);
            }
            Err(e) => {
                last_err = Some(e.into());
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Gemini request failed after retries")))
}

/// Call `generateContent` requesting strict JSON against `schema`.
///
/// Returns the raw candidate text; callers deserialize it into their
/// typed shape so that invalid JSON can be classified separately from
/// transport failures.
pub async fn generate_structured(
    config: &GeminiConfig,
    system_instruction: &str,
    prompt: &str,
    schema: serde_json::Value,
) -> Result<String> {
    let key = api_key()?;
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        API_BASE, config.model, key
    );

    let body = json!({
        "system_instruction": { "parts": [{ "text": system_instruction }] },
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
            "temperature": 0.5,
            "topP": 0.9,
            "maxOutputTokens": 2048,
        }
    });

    let response = post_with_retry(config, &url, &body).await?;
    parse_candidate_text(&response)
}

/// Call `generateContent` without a response schema and return plain text.
pub async fn generate_text(config: &GeminiConfig, prompt: &str) -> Result<String> {
    let key = api_key()?;
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        API_BASE, config.model, key
    );

    let body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
    });

    let response = post_with_retry(config, &url, &body).await?;
    parse_candidate_text(&response)
}

/// Extract `candidates[0].content.parts[0].text` from a generateContent
/// response, reporting the finish reason when the model returned nothing.
fn parse_candidate_text(response: &serde_json::Value) -> Result<String> {
    let candidates = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .filter(|c| !c.is_empty());

    let Some(candidates) = candidates else {
        bail!("No valid response from model: no candidates");
    };

    let text = candidates[0]
        .pointer("/content/parts/0/text")
        .and_then(|t| t.as_str());

    match text {
        Some(t) => Ok(t.trim().to_string()),
        None => {
            let finish_reason = candidates[0]
                .get("finishReason")
                .and_then(|r| r.as_str())
                .unwrap_or("unknown");
            bail!(
                "No valid response from model: empty candidate (finish reason: {})",
                finish_reason
            );
        }
    }
}

/// Embed a single text, tagged with the given task type.
pub async fn embed_text(config: &GeminiConfig, text: &str, task: TaskType) -> Result<Vec<f32>> {
    let key = api_key()?;
    let url = format!(
        "{}/{}:embedContent?key={}",
        API_BASE, config.embedding_model, key
    );

    let body = json!({
        "model": config.embedding_model,
        "content": { "parts": [{ "text": text }] },
        "taskType": task.as_str(),
    });

    let response = post_with_retry(config, &url, &body).await?;
    parse_embedding(&response)
}

/// Embed a batch of texts in one `batchEmbedContents` call, preserving
/// input order.
pub async fn embed_batch(config: &GeminiConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let key = api_key()?;
    let url = format!(
        "{}/{}:batchEmbedContents?key={}",
        API_BASE, config.embedding_model, key
    );

    let requests: Vec<serde_json::Value> = texts
        .iter()
        .map(|text| {
            json!({
                "model": config.embedding_model,
                "content": { "parts": [{ "text": text }] },
                "taskType": TaskType::RetrievalDocument.as_str(),
            })
        })
        .collect();

    let body = json!({ "requests": requests });

    let response = post_with_retry(config, &url, &body).await?;
    parse_batch_embeddings(&response)
}

/// Parse an `embedContent` response: `{"embedding": {"values": [...]}}`.
fn parse_embedding(response: &serde_json::Value) -> Result<Vec<f32>> {
    let values = response
        .pointer("/embedding/values")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid embedding response: missing embedding values"))?;

    parse_values(values).map_err(|e| anyhow::anyhow!("Invalid embedding response: {}", e))
}

/// Every element must be a number; a vector with holes would silently
/// skew distance ordering downstream.
fn parse_values(values: &[serde_json::Value]) -> Result<Vec<f32>> {
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n as f32)
                .ok_or_else(|| anyhow::anyhow!("non-numeric embedding value: {}", v))
        })
        .collect()
}

/// Parse a `batchEmbedContents` response: `{"embeddings": [{"values": [...]}]}`.
fn parse_batch_embeddings(response: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = response
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid batch response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let values = embedding
            .get("values")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid batch response: embedding missing values"))?;

        result.push(
            parse_values(values).map_err(|e| anyhow::anyhow!("Invalid batch response: {}", e))?,
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  {\"summary\": \"ok\"}  " }] }
            }]
        });
        let text = parse_candidate_text(&response).unwrap();
        assert_eq!(text, "{\"summary\": \"ok\"}");
    }

    #[test]
    fn test_parse_candidate_text_no_candidates() {
        let response = json!({ "candidates": [] });
        let err = parse_candidate_text(&response).unwrap_err();
        assert!(err.to_string().contains("No valid response"));
    }

    #[test]
    fn test_parse_candidate_text_empty_candidate_reports_finish_reason() {
        let response = json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        });
        let err = parse_candidate_text(&response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_parse_embedding() {
        let response = json!({ "embedding": { "values": [0.1, -0.2, 0.3] } });
        let values = parse_embedding(&response).unwrap();
        assert_eq!(values.len(), 3);
        assert!((values[1] + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_batch_embeddings_preserves_order() {
        let response = json!({
            "embeddings": [
                { "values": [1.0, 0.0] },
                { "values": [0.0, 1.0] }
            ]
        });
        let batch = parse_batch_embeddings(&response).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], vec![1.0, 0.0]);
        assert_eq!(batch[1], vec![0.0, 1.0]);
    }

    #[test]
    fn test_parse_embedding_rejects_non_numeric_value() {
        let response = json!({ "embedding": { "values": [0.1, "oops", 0.3] } });
        let err = parse_embedding(&response).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_parse_batch_embeddings_rejects_non_numeric_value() {
        let response = json!({
            "embeddings": [
                { "values": [1.0, 0.0] },
                { "values": [0.0, null] }
            ]
        });
        let err = parse_batch_embeddings(&response).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_parse_batch_embeddings_missing_array() {
        let response = json!({ "unexpected": true });
        assert!(parse_batch_embeddings(&response).is_err());
    }

    #[test]
    fn test_task_type_tags() {
        assert_eq!(TaskType::RetrievalQuery.as_str(), "RETRIEVAL_QUERY");
        assert_eq!(TaskType::RetrievalDocument.as_str(), "RETRIEVAL_DOCUMENT");
    }
}
