//! OpenAI-compatible generation backend.
//!
//! Works with any endpoint that speaks the chat-completions protocol:
//!
//! - Groq (default)
//! - OpenAI cloud API
//! - OpenRouter
//! - Ollama / vLLM / LM Studio in OpenAI compatibility mode
//!
//! # Example
//!
//! ```rust,no_run
//! use reviewlens_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use reviewlens_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         api_key: std::env::var("GROQ_API_KEY").ok(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let text = backend.generate("Summarize: great staff", None).await.unwrap();
//!     println!("{text}");
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::{classify_transport, to_generation_error, OpenAIErrorCode};
pub use types::*;
