//! Service context - dependency container for services
//!
//! Holds the storage and transport ports plus deployment-wide bot settings.

use std::sync::Arc;

use meme_core::traits::{ChatTransport, GuildConfigStore, MemeRegistry};
use meme_core::Snowflake;

use super::error::{ServiceError, ServiceResult};

/// Deployment-wide bot settings
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Guild that memes submitted by direct message are posted to
    pub target_guild_id: Snowflake,
    /// Whether `post` credits the submitter unless told otherwise
    pub attribution_default: bool,
}

impl From<&meme_common::BotConfig> for BotSettings {
    fn from(config: &meme_common::BotConfig) -> Self {
        Self {
            target_guild_id: config.target_guild_id,
            attribution_default: config.attribution_default,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    registry: Arc<dyn MemeRegistry>,
    config_store: Arc<dyn GuildConfigStore>,
    transport: Arc<dyn ChatTransport>,
    settings: BotSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        registry: Arc<dyn MemeRegistry>,
        config_store: Arc<dyn GuildConfigStore>,
        transport: Arc<dyn ChatTransport>,
        settings: BotSettings,
    ) -> Self {
        Self {
            registry,
            config_store,
            transport,
            settings,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the meme registry
    pub fn registry(&self) -> &dyn MemeRegistry {
        self.registry.as_ref()
    }

    /// Shared handle to the meme registry
    pub fn registry_arc(&self) -> Arc<dyn MemeRegistry> {
        Arc::clone(&self.registry)
    }

    /// Get the guild config store
    pub fn config_store(&self) -> &dyn GuildConfigStore {
        self.config_store.as_ref()
    }

    /// Shared handle to the guild config store
    pub fn config_store_arc(&self) -> Arc<dyn GuildConfigStore> {
        Arc::clone(&self.config_store)
    }

    /// Get the chat transport
    pub fn transport(&self) -> &dyn ChatTransport {
        self.transport.as_ref()
    }

    /// Shared handle to the chat transport
    pub fn transport_arc(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Get the bot settings
    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("ports", &"...")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    registry: Option<Arc<dyn MemeRegistry>>,
    config_store: Option<Arc<dyn GuildConfigStore>>,
    transport: Option<Arc<dyn ChatTransport>>,
    settings: Option<BotSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(mut self, registry: Arc<dyn MemeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config_store(mut self, store: Arc<dyn GuildConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn settings(mut self, settings: BotSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let settings = self
            .settings
            .ok_or_else(|| ServiceError::validation("settings are required"))?;
        if settings.target_guild_id.is_zero() {
            return Err(ServiceError::validation("target guild id must be set"));
        }

        Ok(ServiceContext::new(
            self.registry
                .ok_or_else(|| ServiceError::validation("registry is required"))?,
            self.config_store
                .ok_or_else(|| ServiceError::validation("config_store is required"))?,
            self.transport
                .ok_or_else(|| ServiceError::validation("transport is required"))?,
            settings,
        ))
    }
}
