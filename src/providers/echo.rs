use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{BlockRequest, ProviderHooks, TranslationProvider};

/// Fallback provider that returns the source lines unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProvider;

#[async_trait]
impl TranslationProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn translate_block(
        &self,
        request: &BlockRequest<'_>,
        _hooks: &ProviderHooks,
    ) -> Result<Vec<String>, ProviderError> {
        Ok(request.lines.to_vec())
    }
}
