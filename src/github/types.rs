use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// GitHub returns numeric ids, but some proxies and fixtures hand back strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PullRequestId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullRequestId::Number(n) => write!(f, "{}", n),
            PullRequestId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBase {
    pub repo: RawRepository,
}

/// A pull request as returned by `GET /repos/{owner}/{repo}/pulls`.
///
/// Only the fields the pipeline consumes are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPullRequest {
    pub id: PullRequestId,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub user: RawUser,
    pub base: RawBase,
}

impl RawPullRequest {
    pub fn author(&self) -> &str {
        &self.user.login
    }

    /// Full name of the repository the PR targets ("owner/repo")
    pub fn repo(&self) -> &str {
        &self.base.repo.full_name
    }
}
