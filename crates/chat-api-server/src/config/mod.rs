mod settings;

pub use settings::{ChatConfig, LlmConfig, ServerConfig, Settings};
