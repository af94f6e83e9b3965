//! Stopword lists
//!
//! Lists are plain text files with one stopword per line. Several lists
//! can be merged into a single [`StopwordSet`]; lookups ignore case.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::Error;

/// Merged, lower-cased set of stopwords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: FxHashSet<String>,
}

impl StopwordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an in-memory list.
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let mut set = Self::new();
        for word in words {
            set.insert(word.as_ref());
        }
        set
    }

    /// Load every file in order and merge the contents.
    ///
    /// Fails on the first file that cannot be read; no partial set is returned.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let mut set = Self::new();
        for path in paths {
            set.extend_from_file(path.as_ref())?;
        }
        Ok(set)
    }

    /// Add the lines of one list file.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })?;

        let before = self.words.len();
        self.extend_from_str(&content);
        let added = self.words.len() - before;
        tracing::debug!("{}: {} new stopwords", path.display(), added);
        Ok(added)
    }

    /// Add newline-delimited stopwords.
    pub fn extend_from_str(&mut self, content: &str) {
        for line in content.lines() {
            self.insert(line);
        }
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim_end_matches('\r');
        if !word.is_empty() {
            self.words.insert(word.to_lowercase());
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
