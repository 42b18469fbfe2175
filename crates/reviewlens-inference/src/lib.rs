//! # reviewlens-inference
//!
//! Generation backends for reviewlens.
//!
//! This crate provides:
//! - An OpenAI-compatible chat-completions backend (Groq by default)
//! - Failure classification onto [`reviewlens_core::FailureKind`]
//! - [`ModelCaller`], which tries a primary model and then its fallback
//! - Environment-driven configuration
//! - A scripted mock backend (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock::ScriptedBackend`] to downstream test suites
//!
//! # Example
//!
//! ```rust,no_run
//! use reviewlens_inference::InferenceConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let caller = InferenceConfig::from_env().unwrap().build_caller().unwrap();
//!     let generation = caller.call("Summarize: friendly staff, long queues").await.unwrap();
//!     println!("{} said: {}", generation.model_used, generation.text);
//! }
//! ```

pub mod caller;
pub mod config;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use caller::{AttemptFailure, Generation, ModelCaller};
pub use config::{ConfigError, ConfigResult, InferenceConfig};
pub use openai::{OpenAIBackend, OpenAIConfig};
