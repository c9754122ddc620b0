pub mod anthropic;
pub mod jina;
pub mod ollama;
pub mod router;
