/*!
 * Provider implementations for different translation backends.
 *
 * This module contains the pluggable backends that translate one block of
 * ID-tagged lines:
 * - `echo`: returns its input unchanged (tests and dry runs)
 * - `local`: runs a llama.cpp style binary and reads its standard output
 * - `api`: posts the block to a remote HTTP translation endpoint
 * - `mock`: scripted behaviours for exercising the alignment protocol
 *
 * Providers are not trusted to preserve order or completeness; callers
 * realign whatever comes back.
 */

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::ProviderSettings;
use crate::errors::{ConfigError, ProviderError};
use crate::translation::Glossary;

pub mod api;
pub mod echo;
pub mod local;
pub mod mock;

pub use api::GenericApiProvider;
pub use echo::EchoProvider;
pub use local::LocalLlamaProvider;

/// One block of lines to translate
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a> {
    /// Instruction prompt for this pass
    pub prompt: &'a str,
    /// ID-tagged input lines
    pub lines: &'a [String],
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    pub glossary: Option<&'a Glossary>,
}

/// Returns true once the caller wants in-flight work to stop
pub type CancelCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// Receives the pid of every spawned external process
pub type ProcessRegistrar = Arc<dyn Fn(u32) + Send + Sync>;

/// Optional caller hooks passed to every provider call.
///
/// The engine never polls these itself; providers that block on external
/// work consult them.
#[derive(Clone, Default)]
pub struct ProviderHooks {
    cancel: Option<CancelCheck>,
    register_process: Option<ProcessRegistrar>,
}

impl ProviderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cancellation check
    pub fn with_cancel_check(mut self, check: CancelCheck) -> Self {
        self.cancel = Some(check);
        self
    }

    /// Set the process registrar
    pub fn with_process_registrar(mut self, registrar: ProcessRegistrar) -> Self {
        self.register_process = Some(registrar);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|check| check())
    }

    /// Report a spawned process to the caller
    pub fn register_process(&self, pid: u32) {
        if let Some(registrar) = &self.register_process {
            registrar(pid);
        }
    }

    /// Resolve once cancellation is requested; never resolves without a check.
    pub async fn cancelled(&self) {
        match &self.cancel {
            Some(check) => {
                while !check() {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Debug for ProviderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHooks")
            .field("cancel", &self.cancel.is_some())
            .field("register_process", &self.register_process.is_some())
            .finish()
    }
}

/// Common trait for all translation providers
///
/// Implementations return candidate output lines for a block. The result may
/// be reordered, incomplete or padded; the alignment protocol sorts it out.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Translate one block of ID-tagged lines
    async fn translate_block(
        &self,
        request: &BlockRequest<'_>,
        hooks: &ProviderHooks,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Built-in provider variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Echo,
    Local,
    Api,
}

impl ProviderKind {
    /// Map a provider name to its variant. Unknown names fall back to echo.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "local" => Self::Local,
            "api" => Self::Api,
            "echo" => Self::Echo,
            other => {
                debug!("Unknown provider '{}', falling back to echo", other);
                Self::Echo
            }
        }
    }
}

/// Resolve a built-in provider from its name and settings.
///
/// The api provider fails here, before any network I/O, when no usable
/// endpoint is configured.
pub fn create_provider(
    name: &str,
    settings: &ProviderSettings,
) -> Result<Arc<dyn TranslationProvider>, ConfigError> {
    let provider: Arc<dyn TranslationProvider> = match ProviderKind::from_name(name) {
        ProviderKind::Echo => Arc::new(EchoProvider),
        ProviderKind::Local => Arc::new(LocalLlamaProvider::new(
            settings.local.binary_path.clone(),
            settings.local.model_path.clone(),
        )),
        ProviderKind::Api => {
            settings.api.validate()?;
            Arc::new(GenericApiProvider::new(
                settings.api.endpoint.trim(),
                settings.api.api_key.clone(),
                Duration::from_secs(settings.api.timeout_secs),
            ))
        }
    };
    Ok(provider)
}

/// Name-based provider lookup with optional custom registrations.
///
/// Registered providers shadow built-in names; everything else goes through
/// [`create_provider`].
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    settings: ProviderSettings,
    custom: HashMap<String, Arc<dyn TranslationProvider>>,
}

impl ProviderRegistry {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            custom: HashMap::new(),
        }
    }

    /// Register a provider under `name` (case-insensitive)
    pub fn register(&mut self, name: &str, provider: Arc<dyn TranslationProvider>) {
        self.custom.insert(name.trim().to_lowercase(), provider);
    }

    /// Builder form of [`ProviderRegistry::register`]
    pub fn with_provider(mut self, name: &str, provider: Arc<dyn TranslationProvider>) -> Self {
        self.register(name, provider);
        self
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Resolve a provider by name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn TranslationProvider>, ConfigError> {
        if let Some(provider) = self.custom.get(&name.trim().to_lowercase()) {
            return Ok(Arc::clone(provider));
        }
        create_provider(name, &self.settings)
    }
}
