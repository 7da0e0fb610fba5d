use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading a vocabulary or label list from disk.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("Vocabulary resource not found: {0}")]
    ResourceNotFound(PathBuf),
    #[error("Vocabulary at {path} is not valid UTF-8")]
    Decoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// An ordered, index-stable list of feature terms.
///
/// The term at position `i` always maps to slot `i` of a feature vector, so
/// the vocabulary that produced a trained model must be shipped alongside it
/// unchanged. The list is immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    /// Loads a vocabulary from a plain-text file, one term per line.
    ///
    /// The file is expected to be UTF-8 and to end with a trailing newline;
    /// the empty final line that newline produces is stripped. Empty lines
    /// elsewhere are kept, preserving slot indices.
    ///
    /// # Errors
    /// - `ResourceNotFound` if the file does not exist
    /// - `Decoding` if the contents are not valid UTF-8
    /// - `Io` for any other read failure
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let terms = read_line_list(path.as_ref())?;
        log::info!(
            "Loaded vocabulary: {} terms from {:?}",
            terms.len(),
            path.as_ref()
        );
        Ok(Self { terms })
    }

    /// Builds a vocabulary from in-memory text using the same line rules as
    /// [`Vocabulary::from_file`].
    pub fn parse(text: &str) -> Self {
        Self {
            terms: parse_line_list(text),
        }
    }

    /// Builds a vocabulary from a list of terms, in order.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of terms, which is also the feature-vector length.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the term at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Iterates terms in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Reads an ordered line list (vocabulary terms, model labels) from a file.
pub(crate) fn read_line_list(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            VocabularyError::ResourceNotFound(path.to_path_buf())
        } else {
            VocabularyError::Io(e)
        }
    })?;
    let text = String::from_utf8(bytes).map_err(|source| VocabularyError::Decoding {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_line_list(&text))
}

fn parse_line_list(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();
    // A well-formed file ends with a newline, which splits into one empty
    // trailing element. Strip exactly that one.
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
