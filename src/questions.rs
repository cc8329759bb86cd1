//! Interview question generator.
//!
//! Validates that a job role and company are present (missing input is a
//! [`Failure`], detected before any external call), gathers web-search
//! background for "<role> interview questions at <company>", and asks the
//! model for five questions — 2 easy theory, 2 medium coding, 1 hard
//! coding — plus a short focus summary, validated against the
//! [`QuestionSet`] schema.

use serde_json::json;

use crate::config::Config;
use crate::gemini;
use crate::models::{JobInfo, QuestionSet};
use crate::outcome::{Failure, Outcome};
use crate::websearch;

const SYSTEM_INSTRUCTION: &str = "You are an experienced technical interviewer. Based on the \
    context provided, generate a list of potential interview questions that assess key skills, \
    concepts, and problem-solving ability for the given role and company. The tone should be \
    professional.";

/// Response schema enforced on the model output.
pub fn question_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "questions": { "type": "array", "items": { "type": "string" } },
            "summary": { "type": "string" }
        },
        "required": ["questions", "summary"]
    })
}

/// Build the generation prompt from job details and search context.
pub fn question_prompt(info: &JobInfo, search_context: &str) -> String {
    format!(
        "Job Role: {}\n\
         Company: {}\n\
         Job Description: {}\n\
         Additional Info: {}\n\n\
         Background Info from web:\n{}\n\n\
         Please generate 5 technical interview questions: 2 easy theory, 2 medium coding, 1 hard coding.\n\
         Also provide a short 2-3 sentence summary on the typical focus of interviews for this role.\n\
         Return strictly in this JSON format:\n\
         {{\"questions\": [\"question1\", \"question2\", ...], \"summary\": \"summary text\"}}",
        info.job_role,
        info.company_name,
        info.job_description,
        info.other_details.as_deref().unwrap_or(""),
        search_context
    )
}

/// Validate the saved job details before any external call is made.
pub fn validate_job_info(details: Option<&JobInfo>) -> Outcome<&JobInfo> {
    match details {
        Some(info)
            if !info.job_role.trim().is_empty() && !info.company_name.trim().is_empty() =>
        {
            Ok(info)
        }
        _ => Err(Failure::missing_input("Missing job role or company name.")),
    }
}

/// Generate a question set for the saved job details.
pub async fn generate_questions(
    config: &Config,
    details: Option<&JobInfo>,
) -> Outcome<QuestionSet> {
    let info = validate_job_info(details)?;

    let search_query = format!(
        "{} interview questions at {}",
        info.job_role, info.company_name
    );
    let search_context = websearch::search_context(&config.websearch, &search_query).await;

    let prompt = question_prompt(info, &search_context);

    let text = gemini::generate_structured(
        &config.gemini,
        SYSTEM_INSTRUCTION,
        &prompt,
        question_schema(),
    )
    .await
    .map_err(|e| Failure::from_upstream(&e))?;

    serde_json::from_str(&text)
        .map_err(|e| Failure::invalid_json(format!("Invalid JSON from Gemini: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    fn job(role: &str, company: &str) -> JobInfo {
        JobInfo {
            candidate_name: "Ada".to_string(),
            job_role: role.to_string(),
            company_name: company.to_string(),
            job_description: "Design and build services.".to_string(),
            other_details: Some("Remote team.".to_string()),
        }
    }

    #[test]
    fn test_validate_rejects_missing_info() {
        let outcome = validate_job_info(None);
        assert_eq!(outcome.unwrap_err().kind, FailureKind::MissingInput);
    }

    #[test]
    fn test_validate_rejects_blank_role() {
        let info = job("  ", "Acme");
        assert!(validate_job_info(Some(&info)).is_err());
    }

    #[test]
    fn test_validate_accepts_complete_info() {
        let info = job("Backend Engineer", "Acme");
        assert!(validate_job_info(Some(&info)).is_ok());
    }

    #[test]
    fn test_prompt_requests_difficulty_split() {
        let info = job("Backend Engineer", "Acme");
        let prompt = question_prompt(&info, "Snippets here.");
        assert!(prompt.contains("2 easy theory, 2 medium coding, 1 hard coding"));
        assert!(prompt.contains("Job Role: Backend Engineer"));
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("Snippets here."));
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = question_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.iter().any(|r| r == "questions"));
        assert!(required.iter().any(|r| r == "summary"));
    }

    #[test]
    fn test_malformed_model_output_maps_to_invalid_json() {
        let parsed: Result<QuestionSet, _> = serde_json::from_str("not json at all");
        let failure = parsed
            .map_err(|e| Failure::invalid_json(format!("Invalid JSON from Gemini: {}", e)))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidJson);
        assert!(failure.to_body()["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON from Gemini"));
    }
}
