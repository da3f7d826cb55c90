//! LLM provider layer for Pricer.
//!
//! # Architecture
//!
//! - [`traits::LlmClient`]: send a prompt, get text back
//! - [`adapters`]: per-provider wire formats (OpenAI/Mistral, Anthropic, Google, stubs)
//! - [`envelope`]: step-by-step reply extraction from response JSON
//! - [`registry`]: known provider tags + [`registry::ClientFactory`]

pub mod adapters;
pub mod envelope;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use adapters::ClientOptions;
pub use registry::{create_client, find_by_name, ClientFactory, ProviderSpec, PROVIDERS};
pub use traits::{ClientError, ErrorKind, LlmClient};
