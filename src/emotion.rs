//! Video frame emotion pipeline.
//!
//! Samples frames from an uploaded video with an `ffmpeg` subprocess,
//! sends each frame to the external emotion-recognition endpoint as a
//! multipart `photo` upload, and aggregates the dominant per-frame labels
//! into a summary. A frame that fails classification is skipped, not
//! fatal: `frames_analyzed` can be lower than `total_frames`.
//!
//! Requires the `LUXAND_API_KEY` environment variable and `ffmpeg` on the
//! PATH.

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::config::EmotionConfig;
use crate::models::{EmotionStat, EmotionSummary};

fn api_token() -> Result<String> {
    std::env::var("LUXAND_API_KEY").map_err(|_| anyhow::anyhow!("LUXAND_API_KEY not set"))
}

/// Analyze an uploaded video and return the aggregated emotion summary.
pub async fn analyze_video(config: &EmotionConfig, video: &[u8]) -> Result<EmotionSummary> {
    let token = api_token()?;

    let workdir = tempfile::tempdir().context("failed to create working directory")?;
    let video_path = workdir.path().join("input.mp4");
    std::fs::write(&video_path, video).context("failed to write uploaded video")?;

    let frames_dir = workdir.path().join("frames");
    std::fs::create_dir_all(&frames_dir)?;
    extract_frames(&video_path, &frames_dir, config.frame_interval_secs)?;

    let mut frame_paths: Vec<_> = std::fs::read_dir(&frames_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    frame_paths.sort();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let mut labels = Vec::new();
    for path in &frame_paths {
        match classify_frame(&client, config, &token, path).await {
            Ok(Some(label)) => labels.push(label),
            Ok(None) => {} // no face detected in this frame
            Err(e) => eprintln!("emotion: frame {} skipped: {}", path.display(), e),
        }
    }

    Ok(summarize(frame_paths.len() as u64, &labels))
}

/// Sample frames at a fixed interval into `dir` as numbered JPEGs.
fn extract_frames(video: &Path, dir: &Path, interval_secs: f64) -> Result<()> {
    let fps = 1.0 / interval_secs;
    let pattern = dir.join("frame_%04d.jpg");

    let status = Command::new("ffmpeg")
        .arg("-i")
        .arg(video)
        .arg("-vf")
        .arg(format!("fps={}", fps))
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg(&pattern)
        .status()
        .context("failed to run ffmpeg (is it installed?)")?;

    if !status.success() {
        bail!("ffmpeg exited with status {}", status);
    }
    Ok(())
}

/// POST one frame to the emotion endpoint and return its dominant label,
/// or `None` when no face was detected.
async fn classify_frame(
    client: &reqwest::Client,
    config: &EmotionConfig,
    token: &str,
    frame: &Path,
) -> Result<Option<String>> {
    let bytes = std::fs::read(frame)?;
    let part = Part::bytes(bytes)
        .file_name("frame.jpg")
        .mime_str("image/jpeg")?;
    let form = Form::new().part("photo", part);

    let response = client
        .post(&config.url)
        .header("token", token)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("emotion API error {}: {}", status, body);
    }

    let json: serde_json::Value = response.json().await?;
    Ok(dominant_emotion(&json))
}

/// Pull the first detected face's dominant emotion label out of an
/// endpoint response (one entry per detected face).
pub fn dominant_emotion(response: &serde_json::Value) -> Option<String> {
    response
        .as_array()?
        .first()?
        .pointer("/emotion/value")?
        .as_str()
        .map(|s| s.to_string())
}

/// Aggregate per-frame labels into counts and ratios. Ratios are over the
/// frames actually analyzed, not the total sampled.
pub fn summarize(total_frames: u64, labels: &[String]) -> EmotionSummary {
    let frames_analyzed = labels.len() as u64;
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }

    let emotions = counts
        .into_iter()
        .map(|(label, count)| {
            let ratio = if frames_analyzed > 0 {
                count as f64 / frames_analyzed as f64
            } else {
                0.0
            };
            (label, EmotionStat { count, ratio })
        })
        .collect();

    EmotionSummary {
        total_frames,
        frames_analyzed,
        emotions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dominant_emotion_first_face() {
        let response = json!([
            { "emotion": { "value": "happy", "probability": 0.92 } },
            { "emotion": { "value": "neutral", "probability": 0.55 } }
        ]);
        assert_eq!(dominant_emotion(&response).unwrap(), "happy");
    }

    #[test]
    fn test_dominant_emotion_no_faces() {
        assert_eq!(dominant_emotion(&json!([])), None);
        assert_eq!(dominant_emotion(&json!({"error": "no people"})), None);
    }

    #[test]
    fn test_summarize_counts_and_ratios() {
        let labels = vec![
            "happy".to_string(),
            "happy".to_string(),
            "neutral".to_string(),
            "happy".to_string(),
        ];
        let summary = summarize(6, &labels);

        assert_eq!(summary.total_frames, 6);
        assert_eq!(summary.frames_analyzed, 4);
        assert_eq!(summary.emotions["happy"].count, 3);
        assert!((summary.emotions["happy"].ratio - 0.75).abs() < 1e-9);
        assert_eq!(summary.emotions["neutral"].count, 1);
        assert!((summary.emotions["neutral"].ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_no_analyzed_frames() {
        let summary = summarize(10, &[]);
        assert_eq!(summary.total_frames, 10);
        assert_eq!(summary.frames_analyzed, 0);
        assert!(summary.emotions.is_empty());
    }
}
