//! Gateway builder
//!
//! Collaborators default from configuration; tests and embedders can inject
//! their own remote, artifact store or clock.

use super::gateway::{GatewayInner, GenerationGateway};
use super::stats::GatewayStats;
use super::validation::InputPolicy;
use crate::config::{Config, GatewayConfig, Validate};
use crate::core::cache::ContentCache;
use crate::core::concurrency::ConcurrencyGate;
use crate::core::providers::{GeminiClient, RemoteGenerator};
use crate::core::quota::{Clock, QuotaTracker, SystemClock};
use crate::core::resilience::ResilientExecutor;
use crate::storage::files::{ArtifactStore, create_artifact_store};
use crate::storage::usage::UsageStateFile;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Builder for [`GenerationGateway`]
pub struct GatewayBuilder {
    config: GatewayConfig,
    remote: Option<Arc<dyn RemoteGenerator>>,
    store: Option<Arc<dyn ArtifactStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl GatewayBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            remote: None,
            store: None,
            clock: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gateway.clone())
    }

    /// Use this remote instead of a Gemini client built from configuration
    pub fn with_remote(mut self, remote: Arc<dyn RemoteGenerator>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Use this artifact store instead of the configured backend
    pub fn with_artifact_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Drive the quota windows from this clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the gateway, restoring persisted usage when configured
    pub async fn build(self) -> Result<GenerationGateway> {
        self.config.validate().map_err(GatewayError::Config)?;
        let config = self.config;

        let remote = match self.remote {
            Some(remote) => remote,
            None => Arc::new(GeminiClient::new(config.provider.clone())?),
        };
        let store = match self.store {
            Some(store) => store,
            None => create_artifact_store(&config.cache).await?,
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let quota = QuotaTracker::with_clock(&config.quota, clock);
        let usage_file = config.quota.state_path.as_ref().map(UsageStateFile::new);
        if let Some(file) = &usage_file {
            if let Err(e) = file.restore_into(&quota).await {
                warn!("Ignoring unreadable usage state {}: {}", file.path().display(), e);
            }
        }

        info!(
            image_units_per_minute = config.quota.image_units_per_minute,
            requests_per_day = config.quota.requests_per_day,
            max_in_flight = config.concurrency.max_in_flight,
            max_attempts = config.retry.max_attempts,
            cache_enabled = config.cache.enabled,
            backend = store.backend(),
            "Generation gateway ready"
        );

        Ok(GenerationGateway {
            inner: Arc::new(GatewayInner {
                policy: InputPolicy::new(config.input.clone())?,
                cache: ContentCache::new(&config.cache, store),
                gate: ConcurrencyGate::new(config.concurrency.max_in_flight),
                executor: ResilientExecutor::new(config.retry.clone()),
                refund_on_fatal: config.quota.refund_on_fatal_failure,
                stats: GatewayStats::default(),
                remote,
                quota,
                usage_file,
            }),
        })
    }
}
