//! Transcript evaluation.
//!
//! Sends a transcript to the language model for structured scoring
//! feedback: per-category evaluation entries, an overall summary, and
//! actionable suggestions, validated against the [`TechnicalFeedback`]
//! schema. The outcome contract matches the question generator: either a
//! schema-valid payload or an error-only object.

use serde_json::json;

use crate::config::Config;
use crate::gemini;
use crate::models::TechnicalFeedback;
use crate::outcome::{Failure, Outcome};

const SYSTEM_INSTRUCTION: &str = "You are a highly skilled technical interviewer. Your job is to \
    evaluate the following technical answer in terms of correctness, clarity, depth of \
    explanation, and conciseness. Provide feedback in a positive, constructive tone along with \
    suggestions for improvement. Your response must follow the provided JSON schema exactly.";

/// Response schema enforced on the model output.
pub fn feedback_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "evaluation": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string" },
                        "score": { "type": "number" },
                        "feedback": { "type": "string" },
                        "improvement_tip": { "type": "string" }
                    },
                    "required": ["category", "score", "feedback", "improvement_tip"]
                }
            },
            "overall_summary": { "type": "string" },
            "actionable_suggestions": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["evaluation", "overall_summary", "actionable_suggestions"]
    })
}

pub fn evaluation_prompt(transcript_text: &str) -> String {
    format!(
        "Please evaluate the following technical answer. Analyze it for correctness, clarity, \
         depth, and conciseness. Provide the results in JSON format as per the schema.\n\n\
         Technical Answer:\n{}",
        transcript_text
    )
}

/// Evaluate a transcript. Never panics: upstream failures, empty
/// responses, and malformed JSON all become [`Failure`] values.
pub async fn evaluate_transcript(
    config: &Config,
    transcript_text: &str,
) -> Outcome<TechnicalFeedback> {
    let prompt = evaluation_prompt(transcript_text);

    let text = gemini::generate_structured(
        &config.gemini,
        SYSTEM_INSTRUCTION,
        &prompt,
        feedback_schema(),
    )
    .await
    .map_err(|e| Failure::from_upstream(&e))?;

    serde_json::from_str(&text)
        .map_err(|e| Failure::invalid_json(format!("Invalid JSON from Gemini: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{outcome_to_value, FailureKind};

    #[test]
    fn test_schema_required_fields() {
        let schema = feedback_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|r| r == "evaluation"));
        assert!(required.iter().any(|r| r == "overall_summary"));
        assert!(required.iter().any(|r| r == "actionable_suggestions"));

        let item_required = schema["properties"]["evaluation"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(item_required.len(), 4);
    }

    #[test]
    fn test_prompt_embeds_transcript() {
        let prompt = evaluation_prompt("I would use a hash map for O(1) lookups.");
        assert!(prompt.contains("Technical Answer:\nI would use a hash map"));
    }

    #[test]
    fn test_valid_model_output_deserializes() {
        let text = r#"{
            "evaluation": [
                {"category": "correctness", "score": 8.5, "feedback": "Solid.", "improvement_tip": "Mention collisions."}
            ],
            "overall_summary": "Good answer.",
            "actionable_suggestions": ["Discuss trade-offs."]
        }"#;
        let feedback: TechnicalFeedback = serde_json::from_str(text).unwrap();
        assert_eq!(feedback.evaluation.len(), 1);
        assert!((feedback.evaluation[0].score - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_partial_model_output_is_rejected_whole() {
        // A response missing a required field must not surface as a
        // partially-populated structure.
        let text = r#"{"evaluation": [], "overall_summary": "ok"}"#;
        let parsed: Result<TechnicalFeedback, _> = serde_json::from_str(text);
        let outcome: Outcome<TechnicalFeedback> = parsed
            .map_err(|e| Failure::invalid_json(format!("Invalid JSON from Gemini: {}", e)));
        let failure = outcome.unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidJson);

        let body = outcome_to_value::<TechnicalFeedback>(&Err(failure));
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("error"));
    }
}
