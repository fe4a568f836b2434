/*!
 * Block-wise subtitle translation.
 *
 * This module turns a document's Japanese segments into translations for one
 * or more target languages. It is split into several submodules:
 *
 * - `alignment`: ID-tagged line protocol and the bounded retry loop
 * - `glossary`: Ordered mandatory terminology and its substitution rule
 * - `prompts`: Prompt texts and the option enums they depend on
 * - `orchestrator`: Options validation and the per-language block loop
 */

// Re-export main types for easier usage
pub use self::alignment::{
    format_postedit_line, format_source_line, parse_aligned_lines, run_aligned_block,
    AlignedBlock, MAX_ALIGNMENT_ATTEMPTS,
};
pub use self::glossary::{apply_glossary, Glossary};
pub use self::orchestrator::{
    ProgressCallback, TranslationOptions, TranslationSummary, Translator, ValidatedOptions,
};
pub use self::prompts::{HonorificPolicy, PromptSettings, TicPolicy, TranslationMode};

// Submodules
pub mod alignment;
pub mod glossary;
pub mod orchestrator;
pub mod prompts;
