//! Image generation: the external service that restyles a captured scene.
//!
//! DESIGN
//! ======
//! `ImageGenerate` is the seam the render flow depends on. `GeminiClient`
//! implements it against the Google Generative Language API; tests supply
//! mocks. Configuration comes from environment variables through
//! [`config::ImageGenConfig::from_env`].

pub mod config;
pub mod gemini;
pub mod types;

pub use gemini::GeminiClient;
pub use types::{GeneratedImage, ImageGenError, ImageGenerate, ImagePayload};
