//! Process-wide interview session state.
//!
//! One interview session lives for the lifetime of the process: a single
//! job record, one growing transcript map, the last generated question set,
//! and the last video analysis. There is no per-user isolation. Handlers
//! share the state through [`SharedSession`] so concurrent requests
//! serialize their writes instead of racing on a bare global.
//!
//! Write semantics differ per field on purpose: job info, the question set,
//! and the video analysis are overwritten by each save, while transcripts
//! are append-only under their timestamp keys and never pruned.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{EmotionSummary, JobInfo, TranscriptEntry};

pub type SharedSession = Arc<RwLock<SessionState>>;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub job_info: Option<JobInfo>,
    /// Transcript entries keyed by ISO-8601 UTC timestamp.
    pub transcripts: BTreeMap<String, TranscriptEntry>,
    /// Last question-generation result, success or error shaped.
    pub question_set: Option<serde_json::Value>,
    pub video_analysis: Option<EmotionSummary>,
}

impl SessionState {
    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(SessionState::default()))
    }

    /// Overwrites any previously saved job details.
    pub fn save_job_info(&mut self, info: JobInfo) {
        self.job_info = Some(info);
    }

    /// Appends a transcript entry under its timestamp key.
    pub fn append_transcript(&mut self, timestamp: String, entry: TranscriptEntry) {
        self.transcripts.insert(timestamp, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(role: &str) -> JobInfo {
        JobInfo {
            candidate_name: "Ada".to_string(),
            job_role: role.to_string(),
            company_name: "Acme".to_string(),
            job_description: "Build backends.".to_string(),
            other_details: None,
        }
    }

    #[test]
    fn test_job_info_starts_empty() {
        let state = SessionState::default();
        assert!(state.job_info.is_none());
    }

    #[test]
    fn test_second_save_overwrites_first() {
        let mut state = SessionState::default();
        state.save_job_info(job("Backend Engineer"));
        state.save_job_info(job("Data Engineer"));
        assert_eq!(state.job_info.unwrap().job_role, "Data Engineer");
    }

    #[test]
    fn test_transcripts_append_under_distinct_keys() {
        let mut state = SessionState::default();
        state.append_transcript(
            "2026-08-30T10:00:00.000001".to_string(),
            TranscriptEntry {
                transcription: "first answer".to_string(),
                analysis: json!({"overall_summary": "ok"}),
            },
        );
        state.append_transcript(
            "2026-08-30T10:05:00.000002".to_string(),
            TranscriptEntry {
                transcription: "second answer".to_string(),
                analysis: json!({"error": "Invalid JSON from Gemini."}),
            },
        );

        assert_eq!(state.transcripts.len(), 2);
        assert_eq!(
            state.transcripts["2026-08-30T10:00:00.000001"].transcription,
            "first answer"
        );
        assert_eq!(
            state.transcripts["2026-08-30T10:05:00.000002"].transcription,
            "second answer"
        );
    }
}
