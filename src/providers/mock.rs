/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates the ways a real backend
 * misbehaves with ID-tagged output:
 * - `MockProvider::working()` - answers every id, in order
 * - `MockProvider::reversed()` - answers every id, in reverse order
 * - `MockProvider::dropping(ids)` - never answers the given ids
 * - `MockProvider::garbage()` - lines without tabs or with unknown ids
 * - `MockProvider::silent()` - returns nothing at all
 * - `MockProvider::failing()` - always fails with a transport error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{BlockRequest, ProviderHooks, TranslationProvider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// `id\t[<target>] <source>` for every input line, in order
    Working,
    /// Same as `Working`, reversed
    Reversed,
    /// Same as `Working` without the listed ids
    Dropping(Vec<String>),
    /// Every id twice; only the first copy is correct
    Duplicated,
    /// Lines the parser must discard
    Garbage,
    /// No output at all
    Silent,
    /// Silent until the given call number (1-based), then `Working`
    SucceedOnCall(usize),
    /// Always fails with an error
    Failing,
}

/// A recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub lines: Vec<String>,
    pub target_lang: String,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Calls made so far, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Requests seen, shared between clones
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn reversed() -> Self {
        Self::new(MockBehavior::Reversed)
    }

    pub fn dropping(ids: &[&str]) -> Self {
        Self::new(MockBehavior::Dropping(ids.iter().map(|s| s.to_string()).collect()))
    }

    pub fn duplicated() -> Self {
        Self::new(MockBehavior::Duplicated)
    }

    pub fn garbage() -> Self {
        Self::new(MockBehavior::Garbage)
    }

    pub fn silent() -> Self {
        Self::new(MockBehavior::Silent)
    }

    pub fn succeed_on_call(call: usize) -> Self {
        Self::new(MockBehavior::SucceedOnCall(call))
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of `translate_block` calls so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the recorded calls
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The translation a working backend would produce for one input line
    pub fn translate_line(line: &str, target_lang: &str) -> Option<String> {
        let (id, rest) = line.split_once('\t')?;
        let source = rest.split('\t').next().unwrap_or_default();
        Some(format!("{}\t[{}] {}", id, target_lang, source))
    }

    fn working_output(request: &BlockRequest<'_>) -> Vec<String> {
        request
            .lines
            .iter()
            .filter_map(|line| Self::translate_line(line, request.target_lang))
            .collect()
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_block(
        &self,
        request: &BlockRequest<'_>,
        _hooks: &ProviderHooks,
    ) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: request.prompt.to_string(),
                lines: request.lines.to_vec(),
                target_lang: request.target_lang.to_string(),
            });
        }

        match &self.behavior {
            MockBehavior::Working => Ok(Self::working_output(request)),

            MockBehavior::Reversed => {
                let mut out = Self::working_output(request);
                out.reverse();
                Ok(out)
            }

            MockBehavior::Dropping(ids) => Ok(Self::working_output(request)
                .into_iter()
                .filter(|line| {
                    let id = line.split('\t').next().unwrap_or_default();
                    !ids.iter().any(|dropped| dropped == id)
                })
                .collect()),

            MockBehavior::Duplicated => Ok(Self::working_output(request)
                .into_iter()
                .flat_map(|line| {
                    let id = line.split('\t').next().unwrap_or_default().to_string();
                    [line, format!("{}\tDUPLICATE", id)]
                })
                .collect()),

            MockBehavior::Garbage => Ok(vec![
                "no tab here".to_string(),
                "999999\tunknown id".to_string(),
                String::new(),
                "\t".to_string(),
            ]),

            MockBehavior::Silent => Ok(Vec::new()),

            MockBehavior::SucceedOnCall(n) => {
                if count >= *n {
                    Ok(Self::working_output(request))
                } else {
                    Ok(Vec::new())
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
        }
    }
}
