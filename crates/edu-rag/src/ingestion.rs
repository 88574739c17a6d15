//! Plain-text chunking for indexable learning materials
//!
//! Upstream extraction (OCR, file parsing) hands plain text to this module;
//! chunks produced here feed `RetrievalClient::upsert_documents`.

use std::path::Path;

use crate::error::Result;
use crate::types::DocumentChunk;

/// Default chunk window in characters
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 64;

/// Split text into fixed-size windows with overlap.
///
/// Operates on characters, not bytes, so multi-byte text never splits
/// mid-codepoint.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    chunks
}

/// Load UTF-8 text files into document chunks.
///
/// Missing paths are skipped. Chunk ids are `{file stem}-{index}`; every
/// chunk's metadata records the originating path under `source`.
pub fn load_text_documents(paths: &[impl AsRef<Path>]) -> Result<Vec<DocumentChunk>> {
    let mut chunks = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "skipping missing document");
            continue;
        }

        let text = std::fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        for (index, piece) in chunk_text(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
            .into_iter()
            .enumerate()
        {
            chunks.push(DocumentChunk::new(
                format!("{}-{}", stem, index),
                piece,
                path.display().to_string(),
            ));
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_cover_text_with_overlap() {
        let text = "a".repeat(1000);

        let chunks = chunk_text(&text, 512, 64);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 512);
        // Second window starts 448 in, so it overlaps the first by 64
        assert_eq!(chunks[1].chars().count(), 512);
        assert_eq!(chunks[2].chars().count(), 1000 - 2 * 448);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("短文本", 512, 64);

        assert_eq!(chunks, vec!["短文本".to_string()]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_text("", 512, 64).is_empty());
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "数学题".repeat(300);

        let chunks = chunk_text(&text, 512, 64);

        // Every chunk is valid UTF-8 by construction; verify the windows
        // are counted in characters, not bytes
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 512));
    }

    #[test]
    fn test_load_skips_missing_paths() {
        let chunks = load_text_documents(&["/nonexistent/material.txt"]).unwrap();

        assert!(chunks.is_empty());
    }

    #[test]
    fn test_load_chunks_and_tags_source() {
        let dir = std::env::temp_dir().join("edu-rag-ingestion-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("algebra.txt");
        std::fs::write(&path, "x".repeat(600)).unwrap();

        let chunks = load_text_documents(&[&path]).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "algebra-0");
        assert_eq!(chunks[1].id, "algebra-1");
        assert_eq!(
            chunks[0].metadata["source"],
            path.display().to_string()
        );

        std::fs::remove_file(&path).ok();
    }
}
