use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_INFER_URL: &str = "https://api.openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a technical interview assistant";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 1000;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Everything the relay needs, read once at startup and shared read-only
/// between requests.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the upstream API. A relay without one still
    /// starts, but every chat call fails.
    pub api_key: Option<Box<str>>,
    /// Full chat-completions endpoint, not just the host.
    pub infer_url: Box<str>,
    pub model: Box<str>,
    pub system_prompt: Box<str>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            infer_url: DEFAULT_INFER_URL.into(),
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honored.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        config.api_key = var("OPENROUTER_API_KEY").map(Into::into);
        if let Some(infer_url) = var("INFER_URL") {
            config.infer_url = infer_url.into();
        }
        if let Some(model) = var("DEFAULT_MODEL") {
            config.model = model.into();
        }
        if let Some(system_prompt) = var("SYSTEM_PROMPT") {
            config.system_prompt = system_prompt.into();
        }
        if let Some(port) = var("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid PORT: {port}"))?;
        }
        if let Some(secs) = var("INFER_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("Invalid INFER_TIMEOUT_SECS: {secs}"))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Log filter from `RUST_LOG`-style directives, falling back to
/// [`DEFAULT_LOG_FILTER`] when they are unset or unparseable.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(&*config.infer_url, DEFAULT_INFER_URL);
        assert_eq!(&*config.model, "deepseek/deepseek-r1:free");
        assert_eq!(&*config.system_prompt, "You are a technical interview assistant");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("INFER_URL", "http://localhost:1234/v1/chat/completions"),
            ("DEFAULT_MODEL", "local-model"),
            ("PORT", "8080"),
            ("INFER_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(&*config.infer_url, "http://localhost:1234/v1/chat/completions");
        assert_eq!(&*config.model, "local-model");
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        let error = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(error.to_string().contains("PORT"));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(Config::from_lookup(lookup(&[("INFER_TIMEOUT_SECS", "-1")])).is_err());
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn log_filter_honors_directives() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }
}
