//! Web-search context for question generation.
//!
//! Queries the DuckDuckGo instant-answer API and concatenates the returned
//! snippets into a background-context block for the question prompt. The
//! search is best-effort: any failure, or a result set with no usable
//! text, degrades to a fixed fallback line rather than an error.

use anyhow::Result;
use std::time::Duration;

use crate::config::WebSearchConfig;

/// Used when the search fails or yields nothing usable.
pub const FALLBACK_CONTEXT: &str =
    "No significant online information found. Use general knowledge.";

/// Search the web for `query` and return concatenated snippets, or the
/// fallback line.
pub async fn search_context(config: &WebSearchConfig, query: &str) -> String {
    match fetch_snippets(config, query).await {
        Ok(snippets) if !snippets.is_empty() => snippets.join("\n"),
        Ok(_) => FALLBACK_CONTEXT.to_string(),
        Err(e) => {
            eprintln!("web search failed: {}", e);
            FALLBACK_CONTEXT.to_string()
        }
    }
}

async fn fetch_snippets(config: &WebSearchConfig, query: &str) -> Result<Vec<String>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    // The instant-answer endpoint serves JSON with a non-JSON content
    // type, so parse from the raw body.
    let body = client
        .get(format!("{}/", config.url.trim_end_matches('/')))
        .query(&[("q", query), ("format", "json"), ("no_html", "1")])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let json: serde_json::Value = serde_json::from_str(&body)?;
    Ok(collect_snippets(&json, config.max_results))
}

/// Pull up to `max` text snippets out of an instant-answer response:
/// the abstract first, then related-topic texts (one nesting level deep).
fn collect_snippets(json: &serde_json::Value, max: usize) -> Vec<String> {
    let mut snippets = Vec::new();

    if let Some(text) = json.get("AbstractText").and_then(|t| t.as_str()) {
        if !text.trim().is_empty() {
            snippets.push(text.trim().to_string());
        }
    }

    if let Some(topics) = json.get("RelatedTopics").and_then(|t| t.as_array()) {
        for topic in topics {
            if snippets.len() >= max {
                break;
            }
            if let Some(text) = topic.get("Text").and_then(|t| t.as_str()) {
                if !text.trim().is_empty() {
                    snippets.push(text.trim().to_string());
                }
            } else if let Some(nested) = topic.get("Topics").and_then(|t| t.as_array()) {
                for inner in nested {
                    if snippets.len() >= max {
                        break;
                    }
                    if let Some(text) = inner.get("Text").and_then(|t| t.as_str()) {
                        if !text.trim().is_empty() {
                            snippets.push(text.trim().to_string());
                        }
                    }
                }
            }
        }
    }

    snippets.truncate(max);
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_abstract_and_topics() {
        let response = json!({
            "AbstractText": "Interviews assess technical and behavioral skills.",
            "RelatedTopics": [
                { "Text": "Common interview questions for engineers." },
                { "Topics": [ { "Text": "Behavioral interview techniques." } ] },
                { "Text": "" }
            ]
        });
        let snippets = collect_snippets(&response, 5);
        assert_eq!(snippets.len(), 3);
        assert!(snippets[0].contains("assess"));
        assert!(snippets[2].contains("Behavioral"));
    }

    #[test]
    fn test_collect_respects_max() {
        let response = json!({
            "AbstractText": "One.",
            "RelatedTopics": [
                { "Text": "Two." }, { "Text": "Three." }, { "Text": "Four." }
            ]
        });
        assert_eq!(collect_snippets(&response, 2).len(), 2);
    }

    #[test]
    fn test_collect_empty_response() {
        let response = json!({ "AbstractText": "", "RelatedTopics": [] });
        assert!(collect_snippets(&response, 5).is_empty());
    }
}
