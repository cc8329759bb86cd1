//! Final report assembly.
//!
//! The retrieval-augmented flow: expand a fixed short prompt into a
//! retrieval query, fetch nearest-neighbor context from the vector store,
//! merge it with everything the session accumulated (job info, questions,
//! transcripts, emotion analysis) into one prompt, and ask the model for a
//! structured report.
//!
//! All session data is interpolated as raw text with no size budget or
//! truncation, so prompt size grows with session length. On any failure
//! the assembler returns `None` and the caller reports a generation
//! failure; `None` is also what a broken retrieval path quietly collapses
//! into — the same empty-context degradation as the query expander.

use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::gemini;
use crate::models::{ContextChunk, InterviewReport};
use crate::query;
use crate::retriever;
use crate::state::SessionState;

const SYSTEM_INSTRUCTION: &str = "\
You are an expert interview analyst AI. You will generate a detailed, structured report in JSON format using:
- Retrieved knowledge base context (interview tips, technical round strategies, behavioral techniques)
- User's job information
- Questions asked in the interview
- Audio transcript from the interview
- Video-based emotional and behavioral analysis

Use all the above data to create:
- A general summary
- Technical round feedback
- Behavioral round feedback
- Communication/body language feedback
- Actionable improvement suggestions (5 max)

Return response in strict JSON only. Use plain, professional language.";

/// The short prompt the expander turns into a full retrieval query.
const RETRIEVAL_SEED: &str = "Give me the best interview tips, tricks, feedbacks";

/// Response schema enforced on the model output.
pub fn report_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "technical_feedback": { "type": "string" },
            "behavioral_feedback": { "type": "string" },
            "communication_feedback": { "type": "string" },
            "suggestions": { "type": "array", "items": { "type": "string" } }
        },
        "required": [
            "summary",
            "technical_feedback",
            "behavioral_feedback",
            "communication_feedback",
            "suggestions"
        ]
    })
}

/// Format retrieved chunks as `Source: s | Page: p` blocks.
pub fn format_chunks(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let page = match chunk.page {
                Some(p) => p.to_string(),
                None => "unknown".to_string(),
            };
            format!("Source: {} | Page: {}\n{}", chunk.source, page, chunk.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn json_block<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Compose the full report prompt from retrieved context and the session.
pub fn compose_prompt(formatted_chunks: &str, session: &SessionState) -> String {
    format!(
        "\n=== Retrieved Context ===\n{}\n\n\
         === Job Info ===\n{}\n\n\
         === Questions Asked ===\n{}\n\n\
         === Audio Transcript ===\n{}\n\n\
         === Video Emotion Analysis ===\n{}\n",
        formatted_chunks,
        json_block(&session.job_info),
        json_block(&session.question_set),
        json_block(&session.transcripts),
        json_block(&session.video_analysis),
    )
}

/// Run the full report flow. Returns `None` on any failure; the caller
/// must handle that explicitly.
pub async fn generate_report(config: &Config, session: &SessionState) -> Option<InterviewReport> {
    let expanded_query = query::expand_query(config, RETRIEVAL_SEED).await;
    let chunks =
        retriever::retrieve_context(config, &expanded_query, config.retrieval.top_k).await;

    let prompt = compose_prompt(&format_chunks(&chunks), session);

    let text = match gemini::generate_structured(
        &config.gemini,
        SYSTEM_INSTRUCTION,
        &prompt,
        report_schema(),
    )
    .await
    {
        Ok(text) => text,
        Err(e) => {
            eprintln!("report generation failed: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(report) => Some(report),
        Err(e) => {
            eprintln!("report JSON invalid: {}", e);
            None
        }
    }
}
