use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use validator::Validate;

use crate::domain::EstimationConfig;

/// Service configuration, merged from `config/default.toml` and
/// `SOLAR_QUOTE__`-prefixed environment variables (double underscore
/// separates sections, e.g. `SOLAR_QUOTE__SERVER__PORT=9000`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub narrative: NarrativeConfig,
    /// Default estimation assumptions applied when a request omits its own.
    pub assumptions: EstimationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
            request_timeout_secs: 30,
        }
    }
}

/// Settings for the AI narrative collaborator. The endpoint speaks the
/// OpenAI-compatible chat-completions dialect; the API key comes from the
/// environment (`SOLAR_QUOTE__NARRATIVE__API_KEY`), never from the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub http_timeout_seconds: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            api_key: String::new(),
            temperature: 0.7,
            http_timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("SOLAR_QUOTE__").split("__")),
        )
    }

    /// TOML admits `nan` and `inf` literals, so the assumptions get the same
    /// bounds check as client-supplied overrides before the service starts.
    fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.assumptions
            .validate()
            .context("invalid [assumptions] in configuration")?;
        Ok(cfg)
    }
}
