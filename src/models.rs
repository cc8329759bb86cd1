//! Core data models used throughout Interview Harness.
//!
//! These types represent the session data that flows through the endpoints
//! and the schema-validated shapes returned by the language model. The
//! structured-output contracts (field names, required sets) are fixed: they
//! are part of the wire compatibility with existing clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Job details saved once per session and overwritten on each save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub candidate_name: String,
    pub job_role: String,
    pub company_name: String,
    pub job_description: String,
    #[serde(default)]
    pub other_details: Option<String>,
}

/// One transcript + evaluation, keyed in the session map by an ISO timestamp.
///
/// `analysis` holds the rendered evaluator outcome: either a schema-valid
/// [`TechnicalFeedback`] object or an error-only object, never a partial
/// structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub transcription: String,
    pub analysis: serde_json::Value,
}

/// Generated interview questions plus a short focus summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
    pub summary: String,
}

/// One scored dimension of a transcript evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalEvaluation {
    pub category: String,
    pub score: f64,
    pub feedback: String,
    pub improvement_tip: String,
}

/// Full evaluator output for a single transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalFeedback {
    pub evaluation: Vec<TechnicalEvaluation>,
    pub overall_summary: String,
    pub actionable_suggestions: Vec<String>,
}

/// Structured final report assembled from the whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewReport {
    pub summary: String,
    pub technical_feedback: String,
    pub behavioral_feedback: String,
    pub communication_feedback: String,
    pub suggestions: Vec<String>,
}

/// A row retrieved from the vector store. Ephemeral: the report flow
/// formats these into the prompt and never persists them.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    pub id: i32,
    pub text: String,
    pub source: String,
    pub page: Option<i32>,
}

/// A chunk ready for insertion into `pdf_embeddings`. Append-only: there
/// is no update or delete path, and re-ingestion appends duplicates.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub text: String,
    pub embedding: Vec<f32>,
    pub source: String,
    pub page: Option<i32>,
}

/// Aggregated per-frame emotion labels for one analyzed video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionSummary {
    pub total_frames: u64,
    pub frames_analyzed: u64,
    pub emotions: BTreeMap<String, EmotionStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionStat {
    pub count: u64,
    pub ratio: f64,
}
