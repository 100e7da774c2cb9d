//! GitHub Gist client implementing [`RemoteStore`].
//!
//! The config lives in a single private Gist file. Only success or failure
//! of each call matters to the sync engine; no retries happen here.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::SyncConfig;
use crate::store::{RemoteHandle, RemoteStore};
use crate::util::{compact_text, is_http_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const CONFIG_FILE_NAME: &str = "echo-nav-config.json";
pub const GIST_DESCRIPTION: &str = "Echo Nav - Personal Navigation Configuration";

const GIST_HTTP_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = concat!("echo-nav/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct GistClient {
    api_base_url: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GistClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GistClient")
            .field("api_base_url", &self.api_base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GistClient {
    /// Client for api.github.com authenticated with `token`
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, token)
    }

    pub fn with_base_url(api_base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url.into())?,
            token: token.into().trim().to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(GIST_HTTP_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.api_base_url))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }

    async fn file_content(&self, gist: &Gist) -> Result<String> {
        let file = gist.files.get(CONFIG_FILE_NAME).ok_or_else(|| {
            Error::Remote(format!("gist {} has no {CONFIG_FILE_NAME}", gist.id))
        })?;

        if let Some(content) = file.inline_content() {
            return Ok(content.to_string());
        }

        let raw_url = file
            .raw_url
            .as_deref()
            .ok_or_else(|| Error::Remote(format!("content of {CONFIG_FILE_NAME} unavailable")))?;
        tracing::debug!(gist = %gist.id, "Fetching truncated config file");
        let response = self
            .client
            .get(raw_url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }
        Ok(response.text().await?)
    }
}

impl RemoteStore for GistClient {
    fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    async fn fetch(&self, handle: &RemoteHandle) -> Result<Value> {
        let gist: Gist = self
            .send(self.request(Method::GET, &format!("/gists/{handle}")))
            .await?;
        let content = self.file_content(&gist).await?;
        serde_json::from_str(&content)
            .map_err(|error| Error::InvalidConfig(format!("config file is not JSON: {error}")))
    }

    async fn create(&self, config: &SyncConfig) -> Result<RemoteHandle> {
        let body = GistWrite::new(config, Some(false))?;
        let gist: Gist = self
            .send(self.request(Method::POST, "/gists").json(&body))
            .await?;
        tracing::info!(gist = %gist.id, "Created config gist");
        Ok(RemoteHandle::new(gist.id))
    }

    async fn update(&self, handle: &RemoteHandle, config: &SyncConfig) -> Result<RemoteHandle> {
        let body = GistWrite::new(config, None)?;
        let gist: Gist = self
            .send(
                self.request(Method::PATCH, &format!("/gists/{handle}"))
                    .json(&body),
            )
            .await?;
        Ok(RemoteHandle::new(gist.id))
    }

    async fn find(&self) -> Result<Option<RemoteHandle>> {
        let gists: Vec<Gist> = self
            .send(self.request(Method::GET, "/gists?per_page=100"))
            .await?;
        Ok(find_config_gist(&gists).map(|gist| RemoteHandle::new(gist.id.clone())))
    }
}

#[derive(Debug, Deserialize)]
struct Gist {
    id: String,
    #[serde(default)]
    files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

impl GistFile {
    fn inline_content(&self) -> Option<&str> {
        if self.truncated {
            return None;
        }
        self.content.as_deref().filter(|content| !content.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct GistWrite {
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    public: Option<bool>,
    files: BTreeMap<&'static str, GistFileWrite>,
}

#[derive(Debug, Serialize)]
struct GistFileWrite {
    content: String,
}

impl GistWrite {
    fn new(config: &SyncConfig, public: Option<bool>) -> Result<Self> {
        let content = serde_json::to_string_pretty(config)?;
        Ok(Self {
            description: GIST_DESCRIPTION,
            public,
            files: BTreeMap::from([(CONFIG_FILE_NAME, GistFileWrite { content })]),
        })
    }
}

fn find_config_gist(gists: &[Gist]) -> Option<&Gist> {
    gists
        .iter()
        .find(|gist| gist.files.contains_key(CONFIG_FILE_NAME))
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<GitHubErrorBody>(body) {
        if let Some(message) = payload.message {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("GitHub API error: HTTP {}", status.as_u16())
    } else {
        format!("{trimmed} ({})", status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("Gist API base URL must not be empty".to_string()))?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "Gist API base URL must include http:// or https://".to_string(),
        ))
    }
}
