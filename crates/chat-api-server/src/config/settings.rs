use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    /// Root of an OpenAI-compatible API, without the /v1 suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Empty means no Authorization header (keyless local servers).
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    /// Number of stored turns forwarded to the model per request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Overrides the built-in system preamble when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> usize {
    200
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_history_window() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            system_prompt: None,
        }
    }
}

impl Settings {
    /// Layered load: optional config/settings.toml, then APP__SECTION__KEY
    /// environment overrides, with OPENAI_API_KEY as credential fallback.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        if settings.llm.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                settings.llm.api_key = key;
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.temperature, 0.1);
        assert_eq!(settings.llm.max_tokens, 200);
        assert_eq!(settings.chat.history_window, 10);
        assert!(settings.llm.api_key.is_empty());
        assert!(settings.chat.system_prompt.is_none());
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let settings: Settings =
            serde_json::from_str(r#"{"llm": {"model": "gpt-4o"}}"#).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o");
        // Untouched fields keep their defaults
        assert_eq!(settings.llm.max_tokens, 200);
        assert_eq!(settings.server.host, "127.0.0.1");
    }
}
