//! Nearest-neighbor context retrieval.
//!
//! Embeds a retrieval query, opens a fresh Postgres connection, and runs a
//! distance-ordered scan of `pdf_embeddings`. Any failure at any step —
//! embedding, connection, query — degrades to an empty list, so callers
//! cannot distinguish "no matches" from "retrieval broken"; that ambiguity
//! is part of the response contract.

use sqlx::Connection;

use crate::config::Config;
use crate::db;
use crate::gemini::{self, TaskType};
use crate::models::ContextChunk;

/// Fetch the `top_k` stored chunks nearest to `query`. Returns an empty
/// vec on any failure.
pub async fn retrieve_context(config: &Config, query: &str, top_k: i64) -> Vec<ContextChunk> {
    let embedding = match gemini::embed_text(&config.gemini, query, TaskType::RetrievalQuery).await
    {
        Ok(values) => values,
        Err(e) => {
            eprintln!("retrieval: embedding failed: {}", e);
            return Vec::new();
        }
    };

    let mut conn = match db::connect(config).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("retrieval: database connection failed: {}", e);
            return Vec::new();
        }
    };

    let literal = db::format_vector(&embedding);

    let rows: Result<Vec<(i32, String, Option<String>, Option<i32>)>, sqlx::Error> =
        sqlx::query_as(
            r#"
            SELECT id, text, source, page
            FROM pdf_embeddings
            ORDER BY embedding <-> $1::vector
            LIMIT $2
            "#,
        )
        .bind(&literal)
        .bind(top_k)
        .fetch_all(&mut conn)
        .await;

    let _ = conn.close().await;

    match rows {
        Ok(rows) => rows
            .into_iter()
            .map(|(id, text, source, page)| ContextChunk {
                id,
                text,
                source: source.unwrap_or_else(|| "unknown".to_string()),
                page,
            })
            .collect(),
        Err(e) => {
            eprintln!("retrieval: query failed: {}", e);
            Vec::new()
        }
    }
}
