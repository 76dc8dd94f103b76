pub mod gemini;
pub mod types;

pub use gemini::{GeminiClient, GenAiError};
pub use types::*;
