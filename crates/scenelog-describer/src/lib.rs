//! Remote multimodal describer client.
//!
//! Provides the [`SceneDescriber`] capability consumed by the ingest job
//! and [`GeminiClient`], its Gemini REST implementation.

pub mod error;
pub mod gemini;
pub mod prompt;

pub use error::DescriberError;
pub use gemini::{GeminiClient, SceneDescriber, DEFAULT_MODEL};
pub use prompt::default_prompt;
