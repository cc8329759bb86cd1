//! AssemblyAI upload-and-poll transcription client.
//!
//! Speech-to-text is delegated entirely to the external service: the raw
//! audio bytes are uploaded, a transcript job is created against the
//! returned URL, and the job is polled until it completes or errors.
//!
//! Requires the `ASSEMBLYAI_API_KEY` environment variable.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::time::Duration;

use crate::config::TranscriptionConfig;

fn api_key() -> Result<String> {
    std::env::var("ASSEMBLYAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("ASSEMBLYAI_API_KEY not set"))
}

/// Transcribe audio bytes: upload, create a transcript job, poll to
/// completion, and return the transcript text.
pub async fn transcribe(config: &TranscriptionConfig, audio: Vec<u8>) -> Result<String> {
    let key = api_key()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let base = config.base_url.trim_end_matches('/');

    // Upload the raw bytes; the service answers with a private URL.
    let upload: serde_json::Value = client
        .post(format!("{}/upload", base))
        .header("authorization", &key)
        .body(audio)
        .send()
        .await
        .context("audio upload request failed")?
        .error_for_status()
        .context("audio upload rejected")?
        .json()
        .await?;

    let audio_url = upload
        .get("upload_url")
        .and_then(|u| u.as_str())
        .ok_or_else(|| anyhow::anyhow!("upload response missing upload_url"))?;

    // Create the transcript job.
    let created: serde_json::Value = client
        .post(format!("{}/transcript", base))
        .header("authorization", &key)
        .json(&json!({ "audio_url": audio_url }))
        .send()
        .await
        .context("transcript creation request failed")?
        .error_for_status()
        .context("transcript creation rejected")?
        .json()
        .await?;

    let id = created
        .get("id")
        .and_then(|i| i.as_str())
        .ok_or_else(|| anyhow::anyhow!("transcript response missing id"))?
        .to_string();

    // Poll until the job settles.
    for _ in 0..config.max_polls {
        tokio::time::sleep(Duration::from_secs(config.poll_interval_secs)).await;

        let status: serde_json::Value = client
            .get(format!("{}/transcript/{}", base, id))
            .header("authorization", &key)
            .send()
            .await
            .context("transcript poll request failed")?
            .error_for_status()
            .context("transcript poll rejected")?
            .json()
            .await?;

        match status.get("status").and_then(|s| s.as_str()) {
            Some("completed") => {
                return Ok(status
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string());
            }
            Some("error") => {
                let detail = status
                    .get("error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("unknown");
                bail!("transcription failed: {}", detail);
            }
            _ => continue,
        }
    }

    bail!(
        "transcription timed out after {} polls",
        config.max_polls
    );
}
