use anyhow::Result;
use sqlx::postgres::PgConnection;
use sqlx::Connection;

use crate::config::Config;

/// Open a single Postgres connection. Callers open and close a connection
/// per operation; there is no pool.
pub async fn connect(config: &Config) -> Result<PgConnection> {
    let url = config.db.url()?;
    Ok(PgConnection::connect(&url).await?)
}

/// Encode an embedding as the bracketed comma-separated float literal the
/// vector column expects for query parameters, e.g. `[0.100000, -0.200000]`.
pub fn format_vector(values: &[f32]) -> String {
    let inner: Vec<String> = values.iter().map(|x| format!("{:.6}", x)).collect();
    format!("[{}]", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vector() {
        let literal = format_vector(&[0.1, -0.25, 3.0]);
        assert_eq!(literal, "[0.100000, -0.250000, 3.000000]");
    }

    #[test]
    fn test_format_vector_empty() {
        assert_eq!(format_vector(&[]), "[]");
    }
}
