/// Module for the concrete backend clients
///
/// This module contains clients for the backend families the catalogue knows:
/// - OpenAI (GPT models, e.g. "ChatGPT")
/// - Google (Gemini models)
/// - Ollama (locally hosted models, e.g. "LLaMa")
///
/// Each client implements the [`Backend`] completion contract and
/// normalizes its provider's response into plain text.

pub mod openai;
pub mod types;
pub mod instances;
pub mod google;
pub mod ollama;

pub use types::{ProviderType, Message};
pub use instances::{Backend, BaseBackend, create_backend};
pub use openai::OpenAIBackend;
pub use google::GoogleBackend;
pub use ollama::OllamaBackend;
