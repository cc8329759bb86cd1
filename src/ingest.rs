//! Chunk + embed + store pipeline.
//!
//! Coordinates the ingestion flow for knowledge-base documents: load a
//! text or PDF file, chunk each page, request embeddings in bulk, and
//! append `(text, vector, source, page)` rows to `pdf_embeddings`.
//!
//! There is deliberately no conflict handling: re-ingesting the same file
//! appends duplicate rows, and there is no update or delete path.

use anyhow::{Context, Result};
use sqlx::Connection;
use std::path::Path;

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::db;
use crate::gemini;
use crate::models::EmbeddingRecord;

/// Text extracted from one page of a source document. Plain-text inputs
/// produce a single page with no page number.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page: Option<i32>,
    pub text: String,
}

/// Load a source file as pages. PDFs are split per page so rows carry
/// real page numbers; anything else is read as UTF-8 plain text.
pub fn load_pages(path: &Path) -> Result<Vec<PageText>> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let pages = pdf_extract::extract_text_by_pages(path)
            .with_context(|| format!("Failed to extract PDF text from {}", path.display()))?;
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText {
                page: Some(i as i32 + 1),
                text,
            })
            .collect())
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(vec![PageText { page: None, text }])
    }
}

/// Chunk the pages under the configured budget, keeping each chunk's
/// source name and page number.
pub fn chunk_pages(pages: &[PageText], source: &str, max_chars: usize) -> Vec<(String, String, Option<i32>)> {
    let mut out = Vec::new();
    for page in pages {
        for text in chunk_text(&page.text, max_chars) {
            out.push((text, source.to_string(), page.page));
        }
    }
    out
}

/// Run the full ingestion flow for one file.
pub async fn run_ingest(config: &Config, path: &Path, source: Option<String>) -> Result<()> {
    let source = source.unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    });

    let pages = load_pages(path)?;
    let chunks = chunk_pages(&pages, &source, config.chunking.max_chars);

    if chunks.is_empty() {
        println!("ingest {}", path.display());
        println!("  no text found; nothing to do");
        return Ok(());
    }

    let texts: Vec<String> = chunks.iter().map(|(text, _, _)| text.clone()).collect();
    let embeddings = gemini::embed_batch(&config.gemini, &texts).await?;

    anyhow::ensure!(
        embeddings.len() == chunks.len(),
        "embedding count {} does not match chunk count {}",
        embeddings.len(),
        chunks.len()
    );

    let records: Vec<EmbeddingRecord> = chunks
        .into_iter()
        .zip(embeddings)
        .map(|((text, source, page), embedding)| EmbeddingRecord {
            text,
            embedding,
            source,
            page,
        })
        .collect();

    let mut conn = db::connect(config).await?;
    let mut inserted = 0u64;

    for record in &records {
        sqlx::query(
            "INSERT INTO pdf_embeddings (text, embedding, source, page) VALUES ($1, $2::vector, $3, $4)",
        )
        .bind(&record.text)
        .bind(db::format_vector(&record.embedding))
        .bind(&record.source)
        .bind(record.page)
        .execute(&mut conn)
        .await?;
        inserted += 1;
    }

    conn.close().await?;

    println!("ingest {}", path.display());
    println!("  pages: {}", pages.len());
    println!("  chunks embedded: {}", records.len());
    println!("  rows appended: {}", inserted);
    println!("ok");

    Ok(())
}
