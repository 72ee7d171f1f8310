use std::fmt;

use thiserror::Error;

pub const DEFAULT_TMDB_API_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set in environment or .env")]
    Missing(&'static str),
}

/// Настройки процесса: читаются один раз при старте и дальше только передаются.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub tmdb_token: String,
    pub proxy: String,
    pub tmdb_api_url: String,
}

impl Config {
    /// Из переменных окружения (`.env` подгружается в `main` до вызова).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bot_token = required("BOT_TOKEN")?;
        let tmdb_token = required("TMDB_TOKEN")?;
        let proxy = required("PROXY")?;
        let tmdb_api_url = lookup("TMDB_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TMDB_API_URL.to_string());

        Ok(Self { bot_token, tmdb_token, proxy, tmdb_api_url })
    }
}

// токены в логи не попадают
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"***")
            .field("tmdb_token", &"***")
            .field("proxy", &self.proxy)
            .field("tmdb_api_url", &self.tmdb_api_url)
            .finish()
    }
}
