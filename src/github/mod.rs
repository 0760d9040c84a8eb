pub mod cache;
pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use cache::{clear_cache, get_cache_path, DiskCacheClient};
pub use client::{GitHubApi, HttpClient, DEFAULT_API_URL, PAGE_SIZE};
pub use error::{FetchError, RequestError};
pub use types::{PullRequestId, RawPullRequest};
