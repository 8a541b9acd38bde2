//! Text generation for task extraction, flowchart breakdown and the
//! assistant.
//!
//! [`TextGenerator`] is the seam the API depends on; [`GeminiClient`] is the
//! production implementation speaking the `generateContent` REST protocol.

pub mod error;
pub mod gemini;
pub mod prompts;

use async_trait::async_trait;

pub use error::LlmError;
pub use gemini::{GeminiClient, GenerationConfig};

/// Which configured model a request is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Pulling tasks out of a transcription.
    Extraction,
    /// Breaking a task into subtasks.
    Flowchart,
    /// Free-form assistant answers and step context.
    Assistant,
}

impl Purpose {
    /// Sampling temperature used for this purpose.
    pub fn temperature(self) -> f32 {
        match self {
            Purpose::Extraction => 0.3,
            Purpose::Flowchart | Purpose::Assistant => 0.7,
        }
    }
}

/// Produces a text completion for a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, purpose: Purpose, prompt: &str) -> Result<String, LlmError>;
}
