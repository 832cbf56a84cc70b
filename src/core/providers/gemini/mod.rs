//! Google Gemini provider
//!
//! Text and image generation through the `generateContent` endpoint of the
//! Gemini API (Google AI Studio).

pub mod client;
pub mod error;
pub mod models;


pub use client::GeminiClient;
pub use error::GeminiErrorMapper;
