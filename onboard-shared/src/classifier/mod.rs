//! Onboarding path classification.
//!
//! - `provider`: the `CompletionProvider` seam and the always-failing
//!   `UnavailableProvider`
//! - `openai`: reqwest client for OpenAI-compatible chat completions
//! - `path_classifier`: label selection and welcome text, with deterministic
//!   fallbacks

pub mod openai;
pub mod path_classifier;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiProvider};
pub use path_classifier::PathClassifier;
pub use provider::{CompletionError, CompletionProvider, UnavailableProvider};
