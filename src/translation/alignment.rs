/*!
 * ID-tagged line alignment.
 *
 * Every line sent to a provider is `<segment-id>\t<payload>` and every line
 * expected back is `<segment-id>\t<translation>`. Output is matched to input
 * by id, never by position, and a block is re-requested until every id has
 * an answer or the attempt ceiling is reached. The result always has one
 * entry per expected id, in expected order.
 */

use log::{debug, warn};
use std::collections::HashMap;

use crate::errors::ProviderError;
use crate::providers::{BlockRequest, ProviderHooks, TranslationProvider};

/// Total provider invocations allowed per block and pass
pub const MAX_ALIGNMENT_ATTEMPTS: usize = 3;

/// `id\tsource` line for a single-pass request
pub fn format_source_line(id: u64, source: &str) -> String {
    format!("{}\t{}", id, source)
}

/// `id\tsource\tdraft` line for a post-edit request
pub fn format_postedit_line(id: u64, source: &str, draft: &str) -> String {
    format!("{}\t{}\t{}", id, source, draft)
}

/// Split one output line into `(id, text)`, both trimmed.
///
/// Returns `None` for lines without a tab.
pub fn split_aligned_line(line: &str) -> Option<(&str, &str)> {
    let (id, text) = line.split_once('\t')?;
    Some((id.trim(), text.trim()))
}

/// Fold provider output into `parsed`, keeping the first text seen per id.
///
/// Lines without a tab, with an id outside `expected_ids`, or repeating an id
/// already present are ignored.
pub fn merge_aligned_lines(
    parsed: &mut HashMap<String, String>,
    lines: &[String],
    expected_ids: &[String],
) {
    for line in lines {
        let Some((id, text)) = split_aligned_line(line) else {
            continue;
        };
        if !expected_ids.iter().any(|expected| expected == id) || parsed.contains_key(id) {
            continue;
        }
        parsed.insert(id.to_string(), text.to_string());
    }
}

/// Parse one provider response into an id -> text map
pub fn parse_aligned_lines(lines: &[String], expected_ids: &[String]) -> HashMap<String, String> {
    let mut parsed = HashMap::new();
    merge_aligned_lines(&mut parsed, lines, expected_ids);
    parsed
}

/// Expected ids with no entry in `parsed`, in expected order
pub fn missing_ids<'a>(parsed: &HashMap<String, String>, expected_ids: &'a [String]) -> Vec<&'a str> {
    expected_ids
        .iter()
        .filter(|id| !parsed.contains_key(id.as_str()))
        .map(String::as_str)
        .collect()
}

/// Outcome of aligning one block
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBlock {
    /// One text per expected id, in expected order; empty when never produced
    pub texts: Vec<String>,

    /// Provider invocations used
    pub attempts: usize,

    /// Ids that never came back
    pub unresolved: Vec<String>,
}

/// Drive `provider` until every expected id is answered or attempts run out.
///
/// Transport errors propagate immediately and are not retried here.
pub async fn run_aligned_block(
    provider: &dyn TranslationProvider,
    request: &BlockRequest<'_>,
    expected_ids: &[String],
    hooks: &ProviderHooks,
) -> Result<AlignedBlock, ProviderError> {
    let mut parsed = HashMap::new();
    let mut attempts = 0;

    while attempts < MAX_ALIGNMENT_ATTEMPTS {
        attempts += 1;
        let raw_output = provider.translate_block(request, hooks).await?;
        merge_aligned_lines(&mut parsed, &raw_output, expected_ids);

        let missing = missing_ids(&parsed, expected_ids);
        if missing.is_empty() {
            break;
        }
        debug!(
            "{}: attempt {}/{} missing {} of {} ids",
            provider.name(),
            attempts,
            MAX_ALIGNMENT_ATTEMPTS,
            missing.len(),
            expected_ids.len()
        );
    }

    let unresolved: Vec<String> = missing_ids(&parsed, expected_ids)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !unresolved.is_empty() {
        warn!(
            "{}: no output for ids [{}] after {} attempts; leaving them empty",
            provider.name(),
            unresolved.join(", "),
            attempts
        );
    }

    let texts = expected_ids
        .iter()
        .map(|id| parsed.remove(id).unwrap_or_default())
        .collect();

    Ok(AlignedBlock {
        texts,
        attempts,
        unresolved,
    })
}
