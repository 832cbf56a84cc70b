//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use super::remote::ScriptedRemote;
use std::sync::Arc;
use storyweaver_gateway::config::GatewayConfig;
use storyweaver_gateway::core::providers::RemotePayload;
use storyweaver_gateway::core::quota::ManualClock;
use storyweaver_gateway::storage::{ArtifactStore, MemoryArtifactStore};
use storyweaver_gateway::{CharacterBlueprint, GenerationGateway, ImageInput};

/// Fixed start instant for manual clocks
pub const T0: u64 = 1_700_000_000_000;

/// Scene prompt used across the suite
pub const KNIGHT_PROMPT: &str =
    "A brave knight discovers a glowing sword in a misty forest at dusk.";

/// Factory for story characters
pub struct CharacterFactory;

impl CharacterFactory {
    pub fn knight() -> CharacterBlueprint {
        CharacterBlueprint::new("char-knight", "Aldric", "tall, silver plate armor, red cloak")
    }

    pub fn dragon() -> CharacterBlueprint {
        CharacterBlueprint::new("char-dragon", "Ember", "emerald scales, smoke curling from nostrils")
    }
}

/// A tiny PNG-looking payload
pub fn png_payload() -> RemotePayload {
    RemotePayload::image(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a], "image/png")
}

/// A style reference image
pub fn style_reference(seed: u8) -> ImageInput {
    ImageInput::new(vec![seed; 16], "image/png")
}

/// Configuration with deterministic backoff
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.retry.jitter_ms = 0;
    config
}

/// Assembles a gateway around a scripted remote
pub struct GatewayFixture {
    pub config: GatewayConfig,
    pub remote: ScriptedRemote,
    pub store: Arc<dyn ArtifactStore>,
    pub clock: Arc<ManualClock>,
}

impl GatewayFixture {
    pub fn new(remote: ScriptedRemote) -> Self {
        Self {
            config: test_config(),
            remote,
            store: Arc::new(MemoryArtifactStore::new()),
            clock: Arc::new(ManualClock::new(T0)),
        }
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn build(self) -> GenerationGateway {
        GenerationGateway::builder(self.config)
            .with_remote(Arc::new(self.remote))
            .with_artifact_store(self.store)
            .with_clock(self.clock)
            .build()
            .await
            .expect("gateway should build")
    }
}
