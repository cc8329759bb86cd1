use anyhow::Result;
use sqlx::Connection;

use crate::config::Config;
use crate::db;

/// Create the vector extension and the append-only embeddings table.
/// Idempotent: running it multiple times is safe.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let mut conn = db::connect(config).await?;

    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(&mut conn)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pdf_embeddings (
            id SERIAL PRIMARY KEY,
            text TEXT NOT NULL,
            embedding VECTOR,
            source TEXT,
            page INT
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    conn.close().await?;
    Ok(())
}
