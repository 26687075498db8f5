//! Turns files on disk into [`Document`]s for the vector store.
//!
//! Each paragraph (text separated by one or more blank lines) becomes one
//! document carrying `source`, `paragraph` and `chunk` metadata; a paragraph
//! longer than the chunk size is cut into overlapping chunks first.
//! Directories are read one level deep, in file-name order.

use std::fs;
use std::path::{Path, PathBuf};

use raggraph::Document;
use tracing::debug;

use crate::config::Error;

/// Metadata key holding the file a document came from.
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding the paragraph's 0-based index within its file.
pub const PARAGRAPH_KEY: &str = "paragraph";
/// Metadata key holding the chunk's 0-based index within its paragraph.
pub const CHUNK_KEY: &str = "chunk";

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Upper bound on document length, in characters, and the overlap between
/// neighbouring chunks of one paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunking {
    size: usize,
    overlap: usize,
}

impl Chunking {
    /// Requires `size > 0` and `overlap < size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err("chunk size must be greater than 0".into());
        }
        if overlap >= size {
            return Err(format!(
                "chunk overlap ({}) must be less than chunk size ({})",
                overlap, size
            )
            .into());
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for Chunking {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Cuts `text` into windows of at most `chunking.size()` characters, each
/// starting `size - overlap` characters after the previous one. Text that fits
/// is returned whole. Cuts fall on `char` boundaries.
pub fn split_chunks(text: &str, chunking: Chunking) -> Vec<String> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let chars = bounds.len() - 1;
    if chars <= chunking.size {
        return vec![text.to_string()];
    }

    let step = chunking.size - chunking.overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunking.size).min(chars);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == chars {
            break;
        }
        start += step;
    }
    chunks
}

/// Splits `text` on blank lines. Paragraphs are trimmed; empty ones are dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current, &mut paragraphs);
        } else {
            current.push(line.trim_end());
        }
    }
    flush(&mut current, &mut paragraphs);
    paragraphs
}

fn flush(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    let joined = current.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
    current.clear();
}

/// Loads every paragraph of every file in `paths`, chunked by `chunking`.
///
/// A directory contributes its regular files (not subdirectories). A missing
/// path or a file that is not UTF-8 is an error naming the path.
pub fn load_documents(paths: &[PathBuf], chunking: Chunking) -> Result<Vec<Document>, Error> {
    let mut documents = Vec::new();
    for path in paths {
        for file in files_under(path)? {
            let text = fs::read_to_string(&file)
                .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
            let source = file.display().to_string();
            let before = documents.len();
            for (i, paragraph) in split_paragraphs(&text).into_iter().enumerate() {
                for (j, chunk) in split_chunks(&paragraph, chunking).into_iter().enumerate() {
                    documents.push(
                        Document::new(chunk)
                            .with_metadata(SOURCE_KEY, source.clone())
                            .with_metadata(PARAGRAPH_KEY, i as u64)
                            .with_metadata(CHUNK_KEY, j as u64),
                    );
                }
            }
            debug!(file = %source, documents = documents.len() - before, "loaded");
        }
    }
    Ok(documents)
}

fn files_under(path: &Path) -> Result<Vec<PathBuf>, Error> {
    let meta =
        fs::metadata(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    if !meta.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    let entries =
        fs::read_dir(path).map_err(|e| format!("cannot list {}: {}", path.display(), e))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
