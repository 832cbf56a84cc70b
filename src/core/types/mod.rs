//! Core type definition module
//!
//! Requests, artifacts and usage snapshots shared by every gateway component.

pub mod artifact;
pub mod request;
pub mod usage;

pub use artifact::{Artifact, ArtifactLocation};
pub use request::{CharacterBlueprint, GenerationRequest, ImageInput, RequestKind};
pub use usage::UsageSnapshot;
