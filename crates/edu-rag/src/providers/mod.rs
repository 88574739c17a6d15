//! Provider abstractions for text generation and embeddings
//!
//! Trait-based abstraction over interchangeable language-model backends,
//! selected by name through the orchestrator's registry.

pub mod deepseek;
pub mod llm;
pub mod mock;
pub mod openai;

pub use deepseek::DeepSeekProvider;
pub use llm::LlmProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
