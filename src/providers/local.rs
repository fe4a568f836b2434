use async_trait::async_trait;
use log::{debug, error};
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::ProviderError;
use crate::providers::{BlockRequest, ProviderHooks, TranslationProvider};
use crate::translation::Glossary;

/// Provider that runs a local llama.cpp style binary once per block.
///
/// The binary is invoked as `<binary> -m <model> -p <prompt>` and every
/// non-empty line of its standard output is a candidate translation line.
#[derive(Debug, Clone)]
pub struct LocalLlamaProvider {
    binary_path: String,
    model_path: String,
}

impl LocalLlamaProvider {
    pub fn new(binary_path: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            model_path: model_path.into(),
        }
    }

    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Single textual prompt embedding instructions, glossary and input lines
    pub fn build_full_prompt(prompt: &str, lines: &[String], glossary: Option<&Glossary>) -> String {
        let glossary_hint = glossary.map(Glossary::hint_lines).unwrap_or_default();
        let joined = lines.join("\n");
        format!(
            "{}\nGlossary:\n{}\nINPUT:\n{}\nOUTPUT:",
            prompt, glossary_hint, joined
        )
        .trim()
        .to_string()
    }

    /// Non-empty trimmed stdout lines, padded with empty strings or truncated
    /// to `expected` entries
    pub fn split_output(stdout: &str, expected: usize) -> Vec<String> {
        let mut lines: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        lines.resize(expected, String::new());
        lines
    }
}

#[async_trait]
impl TranslationProvider for LocalLlamaProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn translate_block(
        &self,
        request: &BlockRequest<'_>,
        hooks: &ProviderHooks,
    ) -> Result<Vec<String>, ProviderError> {
        if hooks.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let full_prompt = Self::build_full_prompt(request.prompt, request.lines, request.glossary);

        let child = Command::new(&self.binary_path)
            .args(["-m", &self.model_path, "-p", &full_prompt])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Spawn {
                binary: self.binary_path.clone(),
                message: e.to_string(),
            })?;

        if let Some(pid) = child.id() {
            debug!("Started {} (pid {}) for {} lines", self.binary_path, pid, request.lines.len());
            hooks.register_process(pid);
        }

        // Dropping the wait future on cancellation drops the child, which kills it.
        let output = tokio::select! {
            result = child.wait_with_output() => {
                result.map_err(|e| ProviderError::Spawn {
                    binary: self.binary_path.clone(),
                    message: e.to_string(),
                })?
            },
            _ = hooks.cancelled() => {
                return Err(ProviderError::Cancelled);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{} failed ({}): {}", self.binary_path, output.status, stderr);
            return Err(ProviderError::ProcessFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::split_output(&stdout, request.lines.len()))
    }
}
