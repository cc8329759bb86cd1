//! Paragraph-boundary text chunker.
//!
//! Splits source text into pieces that respect a configurable character
//! budget. Splitting occurs on paragraph boundaries (`\n\n`) to preserve
//! semantic coherence within each chunk; paragraphs longer than the budget
//! are hard-split at space or newline boundaries.

/// Split text into chunks on paragraph boundaries, respecting `max_chars`.
/// Empty and whitespace-only input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current_buf = String::new();

    for para in text.split("\n\n") {
        let trimmed = para.trim();
        if trimmed.is_empty() {
            continue;
        }

        // If adding this paragraph would exceed max, flush current buffer
        let would_be = if current_buf.is_empty() {
            trimmed.len()
        } else {
            current_buf.len() + 2 + trimmed.len() // +2 for \n\n separator
        };

        if would_be > max_chars && !current_buf.is_empty() {
            chunks.push(std::mem::take(&mut current_buf));
        }

        // If a single paragraph exceeds max, split it at soft boundaries
        if trimmed.len() > max_chars {
            if !current_buf.is_empty() {
                chunks.push(std::mem::take(&mut current_buf));
            }
            let mut remaining = trimmed;
            while !remaining.is_empty() {
                // Byte offsets must land on char boundaries; PDF text is
                // full of multi-byte punctuation and accents.
                let mut split_at = remaining.len().min(max_chars);
                while split_at > 0 && !remaining.is_char_boundary(split_at) {
                    split_at -= 1;
                }
                if split_at == 0 {
                    // max_chars is smaller than the first character; take
                    // that one character whole rather than loop forever.
                    split_at = remaining
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| i)
                        .unwrap_or(remaining.len());
                }
                let actual_split = if split_at < remaining.len() {
                    remaining[..split_at]
                        .rfind('\n')
                        .or_else(|| remaining[..split_at].rfind(' '))
                        .map(|pos| pos + 1)
                        .unwrap_or(split_at)
                } else {
                    split_at
                };
                chunks.push(remaining[..actual_split].trim().to_string());
                remaining = &remaining[actual_split..];
            }
        } else {
            if !current_buf.is_empty() {
                current_buf.push_str("\n\n");
            }
            current_buf.push_str(trimmed);
        }
    }

    if !current_buf.is_empty() {
        chunks.push(current_buf);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_text("Hello, world!", 1200);
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", 1200).is_empty());
        assert!(chunk_text("   \n\n  ", 1200).is_empty());
    }

    #[test]
    fn test_multiple_paragraphs_under_limit() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = chunk_text(text, 1200);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("First paragraph."));
        assert!(chunks[0].contains("Third paragraph."));
    }

    #[test]
    fn test_multiple_paragraphs_exceed_limit() {
        let text = "This is paragraph one.\n\nThis is paragraph two.\n\nThis is paragraph three.";
        let chunks = chunk_text(text, 30);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn test_oversized_paragraph_is_hard_split() {
        let text = "word ".repeat(100);
        let chunks = chunk_text(&text, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40);
        }
    }

    #[test]
    fn test_multibyte_paragraph_hard_split_on_char_boundary() {
        // 100 two-byte chars with no soft boundaries; a split budget that
        // lands mid-character must snap back instead of panicking.
        let text = "é".repeat(100);
        let chunks = chunk_text(&text, 41);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.len() <= 41);
        }
    }

    #[test]
    fn test_multibyte_split_with_soft_boundaries() {
        let text = "a “quoted” phrase — with dashes ".repeat(20);
        let chunks = chunk_text(text.trim(), 50);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn test_budget_smaller_than_one_char_still_terminates() {
        let chunks = chunk_text("日本語", 1);
        assert_eq!(chunks, vec!["日", "本", "語"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha\n\nBeta\n\nGamma\n\nDelta";
        assert_eq!(chunk_text(text, 12), chunk_text(text, 12));
    }
}
