//! Backend construction per provider

use super::{OllamaBackend, OpenAiBackend};
use crate::config::FileProvidersConfig;
use jury_application::{BackendError, ChatBackend};
use jury_domain::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds backends on demand and shares one instance (and HTTP client)
/// per provider across all seats that use it.
pub struct BackendFactory {
    config: FileProvidersConfig,
    built: HashMap<Provider, Arc<dyn ChatBackend>>,
}

impl BackendFactory {
    pub fn new(config: FileProvidersConfig) -> Self {
        Self {
            config,
            built: HashMap::new(),
        }
    }

    /// Backend for `provider`, building it on first use.
    ///
    /// Fails with [`BackendError::MissingCredentials`] when an OpenAI seat
    /// is configured but the key environment variable is unset.
    pub fn backend_for(&mut self, provider: Provider) -> Result<Arc<dyn ChatBackend>, BackendError> {
        if let Some(backend) = self.built.get(&provider) {
            return Ok(Arc::clone(backend));
        }

        let backend: Arc<dyn ChatBackend> = match provider {
            Provider::Ollama => Arc::new(OllamaBackend::new(&self.config.ollama.base_url)),
            Provider::OpenAi => Arc::new(OpenAiBackend::from_env(
                &self.config.openai.base_url,
                &self.config.openai.api_key_env,
            )?),
        };
        debug!(%provider, "Backend created");

        self.built.insert(provider, Arc::clone(&backend));
        Ok(backend)
    }
}
