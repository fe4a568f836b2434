/*!
 * Document translation orchestrator.
 *
 * For each target language, in order, the orchestrator walks the document in
 * fixed-size blocks, runs the alignment protocol against the provider (once,
 * or twice in draft+postedit mode), re-applies the glossary and writes the
 * results back into the segments. Progress is reported after every block and
 * once more when everything is done.
 */

use log::{debug, info};

use crate::document::Document;
use crate::errors::{ConfigError, TranslationError};
use crate::progress::{ProgressEvent, Stage};
use crate::providers::{BlockRequest, ProviderHooks, ProviderRegistry, TranslationProvider};

use super::alignment::{format_postedit_line, format_source_line, run_aligned_block};
use super::glossary::{apply_glossary, Glossary};
use super::prompts::{
    build_postedit_prompt, build_translate_prompt, HonorificPolicy, PromptSettings, TicPolicy,
    TranslationMode,
};

/// Source language sent to providers unless overridden
pub const DEFAULT_SOURCE_LANG: &str = "ja";

/// Default number of segments per block
pub const DEFAULT_BLOCK_SIZE: usize = 20;

/// Observer for progress events, invoked inline on the orchestrator's task
pub type ProgressCallback<'a> = &'a (dyn Fn(ProgressEvent) + Send + Sync);

/// Caller-facing translation options, as raw strings.
///
/// `validate` turns them into typed settings; nothing is sent to a provider
/// before that succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Languages to translate into, processed in this order
    pub target_langs: Vec<String>,

    /// "llm" (single pass) or "draft+postedit"
    pub mode: String,

    /// Provider name resolved through the registry
    pub provider: String,

    /// Segments per provider call
    pub block_size: usize,

    /// Mandatory terminology
    pub glossary: Option<Glossary>,

    /// "keep" or "drop"
    pub honorifics: String,

    /// "keep" or "light"
    pub tics: String,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            target_langs: Vec::new(),
            mode: "llm".to_string(),
            provider: "echo".to_string(),
            block_size: DEFAULT_BLOCK_SIZE,
            glossary: None,
            honorifics: "keep".to_string(),
            tics: "keep".to_string(),
        }
    }
}

/// Typed options produced by [`TranslationOptions::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub mode: TranslationMode,
    pub honorifics: HonorificPolicy,
    pub tics: TicPolicy,
    pub block_size: usize,
}

impl TranslationOptions {
    /// Options for the given target languages with defaults elsewhere
    pub fn new<I, S>(target_langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_langs: target_langs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = mode.to_string();
        self
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        self.provider = provider.to_string();
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = Some(glossary);
        self
    }

    pub fn with_honorifics(mut self, honorifics: &str) -> Self {
        self.honorifics = honorifics.to_string();
        self
    }

    pub fn with_tics(mut self, tics: &str) -> Self {
        self.tics = tics.to_string();
        self
    }

    /// Check the enumerated options and the block size
    pub fn validate(&self) -> Result<ValidatedOptions, ConfigError> {
        let honorifics = self.honorifics.parse::<HonorificPolicy>()?;
        let tics = self.tics.parse::<TicPolicy>()?;
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        Ok(ValidatedOptions {
            mode: TranslationMode::from_name(&self.mode),
            honorifics,
            tics,
            block_size: self.block_size,
        })
    }
}

/// Counters describing a finished translation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Languages translated
    pub languages: usize,
    /// Blocks processed across all languages
    pub blocks: usize,
    /// Provider invocations including alignment retries
    pub provider_calls: usize,
    /// Segment translations left empty because the provider never produced them
    pub unresolved: usize,
}

/// Drives providers over a document.
#[derive(Debug, Clone)]
pub struct Translator {
    registry: ProviderRegistry,
    hooks: ProviderHooks,
    source_lang: String,
}

impl Translator {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            hooks: ProviderHooks::default(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
        }
    }

    /// Hooks forwarded to every provider call
    pub fn with_hooks(mut self, hooks: ProviderHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_source_language(mut self, source_lang: &str) -> Self {
        self.source_lang = source_lang.to_string();
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Translate `doc` into every language of `options.target_langs`.
    ///
    /// Fails before any provider call on invalid options or provider
    /// configuration. Transport errors abort the call; blocks already written
    /// keep their translations.
    pub async fn translate_document(
        &self,
        doc: &mut Document,
        options: &TranslationOptions,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> Result<TranslationSummary, TranslationError> {
        let validated = options.validate()?;
        let provider = self.registry.resolve(&options.provider)?;
        let glossary = options.glossary.as_ref().filter(|g| !g.is_empty());

        let mut summary = TranslationSummary::default();

        for lang in &options.target_langs {
            debug!(
                "Translating to {} using mode={} provider={} honorifics={} tics={}",
                lang,
                validated.mode,
                provider.name(),
                validated.honorifics,
                validated.tics
            );
            self.translate_language(
                doc,
                lang,
                provider.as_ref(),
                &validated,
                glossary,
                on_progress,
                &mut summary,
            )
            .await?;
            summary.languages += 1;
        }

        info!(
            "Translated {} segments into {} language(s): {} blocks, {} provider calls, {} unresolved",
            doc.len(),
            summary.languages,
            summary.blocks,
            summary.provider_calls,
            summary.unresolved
        );

        if let Some(callback) = on_progress {
            let message = if options.target_langs.is_empty() {
                "Translation complete".to_string()
            } else {
                format!("Translation complete ({})", options.target_langs.join(", "))
            };
            callback(ProgressEvent::new(Stage::Translate, 1.0, message));
        }

        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    async fn translate_language(
        &self,
        doc: &mut Document,
        lang: &str,
        provider: &dyn TranslationProvider,
        validated: &ValidatedOptions,
        glossary: Option<&Glossary>,
        on_progress: Option<ProgressCallback<'_>>,
        summary: &mut TranslationSummary,
    ) -> Result<(), TranslationError> {
        doc.ensure_translation_key(lang);

        let settings = PromptSettings {
            target_lang: lang,
            honorifics: validated.honorifics,
            tics: validated.tics,
            has_glossary: glossary.is_some(),
        };
        let translate_prompt = build_translate_prompt(&settings);
        let postedit_prompt = build_postedit_prompt(&settings);

        let block_size = validated.block_size;
        let total_blocks = doc.len().div_ceil(block_size);

        for (block_index, start) in (0..doc.len()).step_by(block_size).enumerate() {
            let end = (start + block_size).min(doc.len());
            let block = &doc.segments[start..end];

            let ids: Vec<String> = block.iter().map(|s| s.id.to_string()).collect();
            let source_lines: Vec<String> = block
                .iter()
                .map(|s| format_source_line(s.id, &s.ja_raw))
                .collect();

            let draft = run_aligned_block(
                provider,
                &BlockRequest {
                    prompt: &translate_prompt,
                    lines: &source_lines,
                    source_lang: &self.source_lang,
                    target_lang: lang,
                    glossary,
                },
                &ids,
                &self.hooks,
            )
            .await?;
            summary.provider_calls += draft.attempts;

            let final_block = match validated.mode {
                TranslationMode::SinglePass => draft,
                TranslationMode::DraftPostedit => {
                    let postedit_lines: Vec<String> = block
                        .iter()
                        .zip(&draft.texts)
                        .map(|(s, text)| format_postedit_line(s.id, &s.ja_raw, text))
                        .collect();
                    let revised = run_aligned_block(
                        provider,
                        &BlockRequest {
                            prompt: &postedit_prompt,
                            lines: &postedit_lines,
                            source_lang: &self.source_lang,
                            target_lang: lang,
                            glossary,
                        },
                        &ids,
                        &self.hooks,
                    )
                    .await?;
                    summary.provider_calls += revised.attempts;
                    revised
                }
            };
            summary.unresolved += final_block.unresolved.len();
            summary.blocks += 1;

            for (segment, text) in doc.segments[start..end].iter_mut().zip(&final_block.texts) {
                segment
                    .translations
                    .insert(lang.to_string(), apply_glossary(text, glossary));
            }

            if let Some(callback) = on_progress {
                let done = block_index + 1;
                callback(
                    ProgressEvent::new(
                        Stage::Translate,
                        done as f64 / total_blocks as f64,
                        format!("Translating to {}", lang),
                    )
                    .with_detail(format!("Block {}/{} ({})", done, total_blocks, lang)),
                );
            }
        }

        Ok(())
    }
}
