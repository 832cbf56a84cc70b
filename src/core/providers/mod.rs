//! Remote generation providers
//!
//! The [`RemoteGenerator`] trait is the only seam between the gateway and a
//! generative API. [`gemini::GeminiClient`] is the production implementation.

pub mod gemini;
pub mod remote;

pub use gemini::GeminiClient;
pub use remote::{
    RemoteCall, RemoteFailure, RemoteGenerator, RemotePart, RemotePayload, ResponseModality,
};

#[cfg(test)]
pub use remote::MockRemoteGenerator;
