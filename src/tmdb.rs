use std::time::Duration;

use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub const LANGUAGE: &str = "ru-RU";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const NO_OVERVIEW: &str = "Описание отсутствует.";

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("cannot build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, token: token.into() }
    }

    /// Клиент для боевого режима: все запросы через прокси, таймаут 10 секунд.
    pub fn from_config(cfg: &Config) -> Result<Self, TmdbError> {
        let proxy = reqwest::Proxy::all(&cfg.proxy).map_err(TmdbError::Build)?;
        let http = Client::builder()
            .proxy(proxy)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tg-kinoteatr-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TmdbError::Build)?;
        Ok(Self::new(http, cfg.tmdb_api_url.clone(), cfg.tmdb_token.clone()))
    }

    /// Поиск по названию (RU, первая страница). Ошибки логируются, наружу — пустой список.
    pub async fn search_movies(&self, query: &str) -> Vec<Movie> {
        let url = format!(
            "{}/search/movie?query={}&language={}&page=1",
            self.base_url,
            urlencoding::encode(query),
            LANGUAGE
        );
        match self.get_json::<ListResp>(&url).await {
            Ok(data) => data.into_movies(),
            Err(e) => {
                warn!(error = %e, query = %query, "TMDb search failed");
                vec![]
            }
        }
    }

    /// Сейчас в кино (RU, первая страница).
    pub async fn now_playing(&self) -> Vec<Movie> {
        let url = format!("{}/movie/now_playing?language={}&page=1", self.base_url, LANGUAGE);
        match self.get_json::<ListResp>(&url).await {
            Ok(data) => data.into_movies(),
            Err(e) => {
                warn!(error = %e, "TMDb now_playing failed");
                vec![]
            }
        }
    }

    pub async fn movie_details(&self, id: u64) -> Result<Movie, TmdbError> {
        let url = format!("{}/movie/{}?language={}", self.base_url, id, LANGUAGE);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TmdbError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TmdbError::Status(status));
        }
        resp.json::<T>().await.map_err(TmdbError::Decode)
    }
}

/* ======= DTOs ======= */

#[derive(Deserialize, Debug)]
struct ListResp {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl ListResp {
    // битые элементы выкидываем по одному, а не весь ответ
    fn into_movies(self) -> Vec<Movie> {
        self.results
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<Movie>(raw) {
                Ok(m) => Some(m),
                Err(e) => {
                    debug!(error = %e, "skipping malformed TMDb entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl Movie {
    pub fn release_year(&self) -> &str {
        self.release_date.as_deref().and_then(|d| d.get(..4)).unwrap_or("")
    }

    pub fn overview_text(&self) -> &str {
        match self.overview.as_deref().map(str::trim) {
            Some(o) if !o.is_empty() => o,
            _ => NO_OVERVIEW,
        }
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| format!("{IMAGE_BASE}{p}"))
    }
}
