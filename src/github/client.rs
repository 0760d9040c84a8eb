use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::debug;

use crate::credentials::Credentials;
use crate::github::error::{FetchError, RequestError};
use crate::github::types::{RawPullRequest, RawRepository};

/// Items requested per page; a shorter page marks the end of the listing
pub const PAGE_SIZE: usize = 100;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Read access to the GitHub REST API.
///
/// Implementors only provide `get_raw`; pagination lives in the provided
/// methods so that decorators such as the disk cache get it for free.
#[allow(async_fn_in_trait)]
pub trait GitHubApi {
    /// GET `path` with the query `params` (sent in the given order) and
    /// return the response body untouched.
    async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<String, RequestError>;

    /// All pull requests (open, closed and merged) of `repo` ("owner/name"),
    /// in the order GitHub lists them.
    async fn pull_requests(&self, repo: &str) -> Result<Vec<RawPullRequest>, FetchError> {
        let path = format!("/repos/{}/pulls", repo);
        paginate(self, &path, &[("state", "all".to_string())], repo).await
    }

    /// Full names of every repository in `org`
    async fn organization_repos(&self, org: &str) -> Result<Vec<String>, FetchError> {
        let path = format!("/orgs/{}/repos", org);
        let repos: Vec<RawRepository> = paginate(self, &path, &[], org).await?;
        Ok(repos.into_iter().map(|r| r.full_name).collect())
    }
}

/// Request pages 1, 2, ... until one comes back with fewer than `PAGE_SIZE`
/// items. Any failing page aborts the whole listing.
async fn paginate<A, T>(
    api: &A,
    path: &str,
    base_params: &[(&str, String)],
    name: &str,
) -> Result<Vec<T>, FetchError>
where
    A: GitHubApi + ?Sized,
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let mut page: u32 = 1;

    loop {
        let mut params = base_params.to_vec();
        params.push(("per_page", PAGE_SIZE.to_string()));
        params.push(("page", page.to_string()));

        let body = api
            .get_raw(path, &params)
            .await
            .map_err(|e| FetchError::from_request(name, e))?;

        let batch: Vec<T> =
            serde_json::from_str(&body).map_err(|source| FetchError::MalformedResponse {
                name: name.to_string(),
                source,
            })?;

        let received = batch.len();
        debug!(name, page, received, "fetched page");
        items.extend(batch);

        if received < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(items)
}

/// Plain HTTP implementation backed by reqwest
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpClient {
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("orko/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<reqwest::Url, RequestError> {
        reqwest::Url::parse_with_params(&format!("{}{}", self.base_url, path), params).map_err(
            |e| RequestError::InvalidUrl {
                path: path.to_string(),
                message: e.to_string(),
            },
        )
    }

    fn request(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        // Request the v3 API explicitly
        let builder = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");

        match &self.credentials {
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => builder.bearer_auth(token),
            Credentials::Anonymous => builder,
        }
    }
}

impl GitHubApi for HttpClient {
    async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<String, RequestError> {
        let url = self.url(path, params)?;

        // Only transport failures are retried; an HTTP error status is final
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        let response = Retry::spawn(retry_strategy, || self.request(url.clone()).send())
            .await
            .map_err(|source| RequestError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| RequestError::Transport {
            path: path.to_string(),
            source,
        })
    }
}
