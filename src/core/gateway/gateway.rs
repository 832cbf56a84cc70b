//! Generation gateway implementation

use super::builder::GatewayBuilder;
use super::stats::{CallPhase, GatewayStats, GatewayStatsSnapshot};
use super::validation::InputPolicy;
use crate::config::Config;
use crate::core::cache::{CacheKey, CacheStats, ContentCache};
use crate::core::concurrency::ConcurrencyGate;
use crate::core::providers::{RemoteCall, RemoteGenerator};
use crate::core::quota::{QuotaTracker, QuotaWindow, Reservation};
use crate::core::resilience::ResilientExecutor;
use crate::core::types::{
    Artifact, CharacterBlueprint, GenerationRequest, ImageInput, UsageSnapshot,
};
use crate::storage::usage::UsageStateFile;
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::prompt_preview;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{Instrument, debug, info, instrument, warn};

pub(super) struct GatewayInner {
    pub(super) remote: Arc<dyn RemoteGenerator>,
    pub(super) quota: QuotaTracker,
    pub(super) cache: ContentCache,
    pub(super) gate: ConcurrencyGate,
    pub(super) executor: ResilientExecutor,
    pub(super) policy: InputPolicy,
    pub(super) stats: GatewayStats,
    pub(super) usage_file: Option<UsageStateFile>,
    pub(super) refund_on_fatal: bool,
}

/// Entry point for all generation requests
///
/// Cheap to clone; clones share quota, cache, gate and statistics.
#[derive(Clone)]
pub struct GenerationGateway {
    pub(super) inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for GenerationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationGateway")
            .field("cache", &self.inner.cache)
            .field("gate", &self.inner.gate)
            .field("usage", &self.inner.quota.snapshot())
            .finish()
    }
}

impl GenerationGateway {
    pub fn builder(config: crate::config::GatewayConfig) -> GatewayBuilder {
        GatewayBuilder::new(config)
    }

    /// Build a gateway from configuration with the default collaborators
    pub async fn from_config(config: &Config) -> Result<Self> {
        GatewayBuilder::from_config(config).build().await
    }

    /// Generate text for a prompt
    pub async fn generate_text(&self, prompt: impl Into<String>) -> Result<String> {
        let artifact = self.generate(GenerationRequest::text(prompt)).await?;
        match artifact.text() {
            Some(text) => Ok(text.to_string()),
            None => Err(GatewayError::protocol("Text response is not valid UTF-8")),
        }
    }

    /// Generate an image from a prompt, characters and style references
    pub async fn generate_image(
        &self,
        prompt: impl Into<String>,
        characters: Vec<CharacterBlueprint>,
        style_references: Vec<ImageInput>,
    ) -> Result<Artifact> {
        self.generate(GenerationRequest::image(prompt, characters, style_references))
            .await
    }

    /// Edit an existing image
    pub async fn edit_image(
        &self,
        source_bytes: impl Into<Bytes>,
        mime_type: impl Into<String>,
        prompt: impl Into<String>,
        characters: Vec<CharacterBlueprint>,
    ) -> Result<Artifact> {
        let source = ImageInput::new(source_bytes, mime_type);
        self.generate(GenerationRequest::edit(source, prompt, characters))
            .await
    }

    /// Current quota usage; never mutates state
    pub fn get_usage_snapshot(&self) -> UsageSnapshot {
        self.inner.quota.snapshot()
    }

    pub fn stats(&self) -> GatewayStatsSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Remote calls holding a concurrency slot right now
    pub fn in_flight(&self) -> usize {
        self.inner.gate.in_flight()
    }

    /// Highest number of simultaneous remote calls so far
    pub fn peak_in_flight(&self) -> usize {
        self.inner.gate.peak_in_flight()
    }

    /// Run one generation request
    ///
    /// Once quota is reserved the remote work runs in its own task, so
    /// dropping the returned future does not cancel an admitted call: it
    /// still completes, fills the cache and releases its slot.
    #[instrument(skip_all, fields(request = request.label()))]
    pub async fn generate(&self, request: GenerationRequest) -> Result<Artifact> {
        let inner = &self.inner;
        GatewayStats::incr(&inner.stats.requests);

        debug!(phase = %CallPhase::Validating, prompt = %prompt_preview(request.prompt()));
        if let Err(e) = inner.policy.validate(&request) {
            GatewayStats::incr(&inner.stats.validation_rejections);
            debug!(phase = %CallPhase::Failed, "Validation failed: {}", e);
            return Err(e);
        }

        let key = CacheKey::for_request(&request);
        debug!(phase = %CallPhase::CacheCheck, %key);
        if let Some(entry) = inner.cache.lookup(&key).await {
            GatewayStats::incr(&inner.stats.cache_hits);
            info!(%key, "Served from cache");
            return Ok(entry.into_artifact(true));
        }
        GatewayStats::incr(&inner.stats.cache_misses);

        debug!(phase = %CallPhase::QuotaCheck);
        let reservation = inner.quota.reserve(request.kind());
        if !reservation.allowed {
            GatewayStats::incr(&inner.stats.quota_rejections);
            return Err(GatewayError::quota_exceeded(
                quota_message(&reservation),
                reservation.exhausted.unwrap_or(QuotaWindow::Requests),
                reservation.snapshot,
            ));
        }

        let admitted = self.inner.clone();
        let span = tracing::Span::current();
        let task = async move { admitted.run_admitted(request, key, reservation).await };
        tokio::spawn(task.instrument(span))
            .await
            .map_err(|e| GatewayError::internal(format!("Generation task failed: {}", e)))?
    }
}

impl GatewayInner {
    async fn run_admitted(
        &self,
        request: GenerationRequest,
        key: CacheKey,
        reservation: Reservation,
    ) -> Result<Artifact> {
        self.persist_usage().await;

        debug!(phase = %CallPhase::AwaitingSlot, available = self.gate.available());
        let slot = self.gate.acquire().await?;

        debug!(phase = %CallPhase::Executing);
        GatewayStats::incr(&self.stats.remote_calls);
        let call = RemoteCall::from_request(&request);
        let remote = &self.remote;
        let execution = self.executor.execute(|| remote.generate(&call)).await;
        drop(slot);

        GatewayStats::add(&self.stats.remote_attempts, u64::from(execution.attempts));
        let attempts = execution.attempts;
        let fatal = execution.is_fatal();

        match execution.into_result() {
            Ok(payload) => {
                let entry = self
                    .cache
                    .store(&key, payload.bytes, &payload.mime_type)
                    .await?;
                GatewayStats::incr(&self.stats.remote_successes);
                info!(
                    phase = %CallPhase::Cached,
                    %key,
                    attempts,
                    bytes = entry.bytes.len(),
                    "Generation completed"
                );
                Ok(entry.into_artifact(false))
            }
            Err(e) => {
                GatewayStats::incr(&self.stats.remote_failures);
                if fatal && self.refund_on_fatal {
                    self.quota.refund(&reservation);
                    GatewayStats::incr(&self.stats.refunds);
                    self.persist_usage().await;
                }
                warn!(
                    phase = %CallPhase::Failed,
                    attempts,
                    kind = %e.kind(),
                    "Generation failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn persist_usage(&self) {
        if let Some(file) = &self.usage_file {
            if let Err(e) = file.save_from(&self.quota).await {
                warn!("Failed to persist usage state: {}", e);
            }
        }
    }
}

fn quota_message(reservation: &Reservation) -> String {
    let snapshot = &reservation.snapshot;
    match reservation.exhausted {
        Some(QuotaWindow::Units) => format!(
            "Image limit of {} per minute reached; resets in {}s",
            snapshot.unit_limit, snapshot.units_reset_in_seconds
        ),
        _ => format!(
            "Daily request limit of {} reached; resets in {}s",
            snapshot.request_limit, snapshot.requests_reset_in_seconds
        ),
    }
}
