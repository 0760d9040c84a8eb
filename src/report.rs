use tracing::{debug, info};

use crate::github::{FetchError, GitHubApi, RawPullRequest};
use crate::grouping::{group, GroupMode};
use crate::pulls::{normalize, NormalizeOptions};
use crate::stats::{summarize, GroupStatistics};

/// One output line: a group key and its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub key: String,
    pub stats: GroupStatistics,
}

/// Repositories to query: the explicit list followed by every repository of
/// `org`, if given. Duplicates are dropped, first occurrence wins.
pub async fn resolve_repos<A: GitHubApi>(
    api: &A,
    repos: &[String],
    org: Option<&str>,
) -> Result<Vec<String>, FetchError> {
    let mut resolved: Vec<String> = Vec::new();
    for repo in repos {
        if !resolved.contains(repo) {
            resolved.push(repo.clone());
        }
    }

    if let Some(org) = org {
        let org_repos = api.organization_repos(org).await?;
        debug!(org, count = org_repos.len(), "listed organization repositories");
        for repo in org_repos {
            if !resolved.contains(&repo) {
                resolved.push(repo);
            }
        }
    }

    Ok(resolved)
}

/// Fetch pull requests for each repository in turn.
///
/// The first failing repository aborts the run; nothing fetched so far is
/// returned.
pub async fn fetch_all<A: GitHubApi>(
    api: &A,
    repos: &[String],
) -> Result<Vec<RawPullRequest>, FetchError> {
    let mut all_prs = Vec::new();
    for repo in repos {
        let prs = api.pull_requests(repo).await?;
        info!(repo = %repo, count = prs.len(), "fetched pull requests");
        all_prs.extend(prs);
    }
    Ok(all_prs)
}

/// Normalize, group and summarize. Rows come out in the grouping order.
pub fn build_report(
    raw: &[RawPullRequest],
    options: NormalizeOptions,
    mode: GroupMode,
) -> Vec<ReportRow> {
    let pulls = normalize(raw, options);
    debug!(raw = raw.len(), merged = pulls.len(), "normalized pull requests");

    group(&pulls, mode)
        .into_iter()
        .map(|g| ReportRow {
            stats: summarize(&g.records),
            key: g.key,
        })
        .collect()
}
