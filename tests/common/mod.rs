/*!
 * Common test utilities for the jp2subs test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use jp2subs::{Document, DocumentMeta, ProgressEvent, Segment};


// Re-export the HTTP stub server
pub mod http_stub;

/// Routes `log` output to the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a document with one segment per text, ids starting at 1
pub fn sample_document(texts: &[&str]) -> Document {
    let segments = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let start = i as f64 * 2.0;
            Segment::new(i as u64 + 1, start, start + 1.5, *text).unwrap()
        })
        .collect();
    Document::new(DocumentMeta::new("test.mkv"), segments)
}

/// Collects progress events emitted through a callback
#[derive(Clone, Default)]
pub struct EventSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback suitable for `translate_document`
    pub fn callback(&self) -> impl Fn(ProgressEvent) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event| events.lock().unwrap().push(event)
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}
