use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, info, warn};

use crate::embedding::error::EmbeddingError;

/// On-disk layout of a word2vec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordVectorFormat {
    /// `"<vocab> <dim>\n"` header, then `token<space><dim x f32 LE>` records.
    Binary,
    /// `"<vocab> <dim>\n"` header, then one whitespace-separated `token v1 .. vdim` per line.
    Text,
}

impl WordVectorFormat {
    /// Guesses the format from the file extension (`.txt` / `.vec` are text).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") | Some("vec") => WordVectorFormat::Text,
            _ => WordVectorFormat::Binary,
        }
    }
}

/// Static word vectors stored as contiguous `f32` rows.
pub struct WordVectors {
    dim: usize,
    vocab: HashMap<String, usize>,
    data: Vec<f32>,
}

impl std::fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordVectors")
            .field("dim", &self.dim)
            .field("vocab_size", &self.vocab.len())
            .finish()
    }
}

impl WordVectors {
    /// `capacity` comes from the file header; callers bound it by what the file can hold.
    fn with_capacity(dim: usize, capacity: usize) -> Self {
        Self {
            dim,
            vocab: HashMap::with_capacity(capacity),
            data: Vec::with_capacity(capacity.saturating_mul(dim)),
        }
    }

    /// Loads a word2vec file, picking the format from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        Self::load_with_format(path, WordVectorFormat::from_path(path))
    }

    /// Loads a word2vec file in the given format.
    pub fn load_with_format(
        path: impl AsRef<Path>,
        format: WordVectorFormat,
    ) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(EmbeddingError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        // SAFETY: read-only mapping, dropped before returning. Concurrent truncation of the
        // file by another process is outside what we support.
        let mmap = unsafe { Mmap::map(&file)? };

        debug!(path = %path.display(), ?format, bytes = mmap.len(), "Parsing word vectors");

        let vectors = match format {
            WordVectorFormat::Binary => Self::parse_binary(&mmap)?,
            WordVectorFormat::Text => Self::parse_text(&mmap)?,
        };

        info!(
            path = %path.display(),
            vocab_size = vectors.len(),
            dim = vectors.dim(),
            "Word vectors loaded"
        );

        Ok(vectors)
    }

    /// Builds an in-memory table (tests, custom embedders).
    pub fn from_entries<I, S>(dim: usize, entries: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        if dim == 0 {
            return Err(EmbeddingError::InvalidHeader {
                reason: "dimension must be non-zero".to_string(),
            });
        }

        let mut vectors = Self::with_capacity(dim, 0);
        for (token, values) in entries {
            let token = token.into();
            if values.len() != dim {
                return Err(EmbeddingError::DimensionMismatch {
                    token,
                    expected: dim,
                    actual: values.len(),
                });
            }
            vectors.push_row(token, values.into_iter());
        }
        Ok(vectors)
    }

    fn parse_header(bytes: &[u8]) -> Result<(usize, usize, usize), EmbeddingError> {
        let newline = bytes.iter().position(|&b| b == b'\n').ok_or_else(|| {
            EmbeddingError::InvalidHeader {
                reason: "missing header line".to_string(),
            }
        })?;

        let header = String::from_utf8_lossy(&bytes[..newline]);
        let mut fields = header.split_whitespace().map(str::parse::<usize>);

        let (Some(Ok(vocab_size)), Some(Ok(dim)), None) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(EmbeddingError::InvalidHeader {
                reason: format!("expected '<vocab> <dim>', got '{}'", header.trim()),
            });
        };

        if dim == 0 {
            return Err(EmbeddingError::InvalidHeader {
                reason: "dimension must be non-zero".to_string(),
            });
        }

        if vocab_size > 0 && dim > bytes.len() {
            return Err(EmbeddingError::InvalidHeader {
                reason: format!("dimension {dim} exceeds file size of {} bytes", bytes.len()),
            });
        }

        Ok((vocab_size, dim, newline + 1))
    }

    fn parse_binary(bytes: &[u8]) -> Result<Self, EmbeddingError> {
        let (expected, dim, mut pos) = Self::parse_header(bytes)?;
        let row_bytes = dim * std::mem::size_of::<f32>();
        // Each record is at least a one-byte token, a space and the row.
        let fits = (bytes.len() - pos) / (row_bytes + 2);
        let mut vectors = Self::with_capacity(dim, expected.min(fits));

        for loaded in 0..expected {
            while bytes.get(pos).is_some_and(|&b| b == b'\n' || b == b'\r') {
                pos += 1;
            }

            let Some(space) = bytes[pos..].iter().position(|&b| b == b' ') else {
                return Err(EmbeddingError::Truncated { loaded, expected });
            };
            let token = String::from_utf8_lossy(&bytes[pos..pos + space]).into_owned();
            pos += space + 1;

            let Some(row) = bytes.get(pos..pos + row_bytes) else {
                return Err(EmbeddingError::Truncated { loaded, expected });
            };
            vectors.push_row(
                token,
                row.chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
            );
            pos += row_bytes;
        }

        Ok(vectors)
    }

    fn parse_text(bytes: &[u8]) -> Result<Self, EmbeddingError> {
        let (expected, dim, pos) = Self::parse_header(bytes)?;
        let body = String::from_utf8_lossy(&bytes[pos..]);
        // Each line is at least a token plus `dim` space-separated single digits.
        let fits = body.len() / (2 * dim + 1);
        let mut vectors = Self::with_capacity(dim, expected.min(fits));

        let mut loaded = 0;
        for line in body.lines().filter(|l| !l.trim().is_empty()) {
            if loaded == expected {
                break;
            }

            let mut fields = line.split_whitespace();
            let Some(token) = fields.next() else {
                continue;
            };
            let values = fields
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| EmbeddingError::ModelLoadFailed {
                    reason: format!("bad component for '{}': {}", token, e),
                })?;

            if values.len() != dim {
                return Err(EmbeddingError::DimensionMismatch {
                    token: token.to_string(),
                    expected: dim,
                    actual: values.len(),
                });
            }

            vectors.push_row(token.to_string(), values.into_iter());
            loaded += 1;
        }

        if loaded < expected {
            return Err(EmbeddingError::Truncated { loaded, expected });
        }

        Ok(vectors)
    }

    fn push_row(&mut self, token: String, values: impl Iterator<Item = f32>) {
        if self.vocab.contains_key(&token) {
            warn!(token = %token, "Duplicate word vector entry ignored");
            return;
        }
        let row = self.vocab.len();
        self.data.extend(values);
        self.vocab.insert(token, row);
    }

    fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    /// Returns the vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the vocabulary size.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    /// Returns the vector for `token` (case-sensitive lookup).
    pub fn vector(&self, token: &str) -> Option<Vec<f32>> {
        self.vocab
            .get(token)
            .map(|&idx| self.row(idx).to_vec())
    }

    /// Mean of the known whitespace tokens of `text`.
    ///
    /// Unknown tokens are skipped; empty or all-unknown input yields the zero vector.
    pub fn sentence_embedding(&self, text: &str) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dim];
        let mut known = 0usize;

        for token in text.split_whitespace() {
            if let Some(&idx) = self.vocab.get(token) {
                for (acc, x) in sum.iter_mut().zip(self.row(idx)) {
                    *acc += x;
                }
                known += 1;
            }
        }

        if known > 0 {
            let n = known as f32;
            for x in &mut sum {
                *x /= n;
            }
        }

        sum
    }
}
