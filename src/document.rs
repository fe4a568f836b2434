/*!
 * Document model for timestamped dialogue.
 *
 * A [`Document`] is produced upstream by ingest/transcription, mutated in place
 * by translation, and handed to export. Segment order is playback order and is
 * never changed by any operation in this crate.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::errors::AppError;

/// One timed line of dialogue with its per-language translations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique identifier, stable across stages
    pub id: u64,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds (`end >= start`)
    pub end: f64,

    /// Original Japanese text
    pub ja_raw: String,

    /// Target language code -> translated text
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl Segment {
    /// Create an untranslated segment.
    ///
    /// Fails with [`AppError::Document`] when `id` is 0 or `end < start`.
    pub fn new(id: u64, start: f64, end: f64, ja_raw: impl Into<String>) -> Result<Self, AppError> {
        let segment = Self {
            id,
            start,
            end,
            ja_raw: ja_raw.into(),
            translations: BTreeMap::new(),
        };
        segment.check()?;
        Ok(segment)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.id == 0 {
            return Err(AppError::Document("segment ids start at 1, found 0".to_string()));
        }
        if self.end < self.start {
            return Err(AppError::Document(format!(
                "segment {} ends before it starts ({} < {})",
                self.id, self.end, self.start
            )));
        }
        Ok(())
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Translation for `lang`, if present
    pub fn translation(&self, lang: &str) -> Option<&str> {
        self.translations.get(lang).map(String::as_str)
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Where the document came from (file path, URL, test name)
    pub source: String,

    /// Translation keys ensured so far, in first-use order
    #[serde(default)]
    pub languages: Vec<String>,
}

impl DocumentMeta {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            languages: Vec::new(),
        }
    }
}

/// Ordered collection of segments plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub meta: DocumentMeta,
    pub segments: Vec<Segment>,
}

impl Document {
    pub fn new(meta: DocumentMeta, segments: Vec<Segment>) -> Self {
        Self { meta, segments }
    }

    /// Register `lang` as a translation key. Ensuring twice is a no-op.
    pub fn ensure_translation_key(&mut self, lang: &str) {
        if !self.meta.languages.iter().any(|l| l == lang) {
            self.meta.languages.push(lang.to_string());
        }
    }

    /// Whether `lang` has been registered as a translation key
    pub fn has_translation_key(&self, lang: &str) -> bool {
        self.meta.languages.iter().any(|l| l == lang)
    }

    /// Translations for `lang` in segment order
    pub fn translations_for(&self, lang: &str) -> Vec<Option<&str>> {
        self.segments.iter().map(|s| s.translation(lang)).collect()
    }

    /// Check if every segment carries a translation for `lang`.
    pub fn is_translated(&self, lang: &str) -> bool {
        self.segments.iter().all(|s| s.translations.contains_key(lang))
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parse a document from JSON.
    ///
    /// Rejects id 0, repeated ids and segments with `end < start`.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let doc: Document = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(doc.segments.len());
        for segment in &doc.segments {
            segment.check()?;
            if !seen.insert(segment.id) {
                return Err(AppError::Document(format!(
                    "segment id {} appears more than once",
                    segment.id
                )));
            }
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a JSON file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::File(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Write the document as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        fs::write(path, self.to_json()?)
            .map_err(|e| AppError::File(format!("{}: {}", path.display(), e)))
    }
}
