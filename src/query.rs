//! Retrieval query expansion.
//!
//! Turns a short prompt into a long, keyword-rich retrieval query via the
//! language model. Failure is swallowed: the report flow degrades to "no
//! context" rather than erroring, so this returns an empty string on any
//! problem.

use crate::config::Config;
use crate::gemini;

/// Build the fixed expansion instruction around the user's short prompt.
pub fn expansion_prompt(short_prompt: &str) -> String {
    format!(
        r#"You are assisting in an AI-powered interview analysis system.

The user has given a short or vague prompt:
"{short_prompt}"

Your task is to expand this into a highly detailed, structured query that can be used to retrieve meaningful and diverse information from an interview knowledge base. This knowledge base contains:
- Books, guides, and expert tips on behavioral interviews
- Technical round strategies and questions
- Preparation advice, dos and don'ts
- Common mistakes and recruiter feedback
- Communication, body language, and psychological readiness

The output query should:
- Be 5-6 sentences long
- Include specific keywords and concepts (like "behavioral expectations", "common technical pitfalls", "effective communication", "preparation strategies")
- Be written in a natural and information-seeking tone
- Aim to retrieve well-rounded and actionable content
- In points

Give only the expanded query without extra commentary."#
    )
}

/// Expand a short prompt into a retrieval query. Returns an empty string
/// on any failure (network, quota, malformed response).
pub async fn expand_query(config: &Config, short_prompt: &str) -> String {
    let prompt = expansion_prompt(short_prompt);
    match gemini::generate_text(&config.gemini, &prompt).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("query expansion failed: {}", e);
            String::new()
        }
    }
}
