// Service exports
pub mod bridge;
pub mod catalog;
pub mod fallback;
pub mod llm;

pub use bridge::{LanguageBridge, DEFAULT_BRIDGE_TIMEOUT};
pub use catalog::{Catalog, CatalogError};
pub use llm::{GeminiClient, LlmError, TextGenerator};
