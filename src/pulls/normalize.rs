use chrono::{DateTime, Datelike, Duration, Local, Timelike, Weekday};
use std::collections::HashSet;
use tracing::debug;

use crate::github::types::{PullRequestId, RawPullRequest};

/// A merged pull request with its timestamps in local time.
///
/// Only built for PRs that have a merge timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPullRequest {
    pub id: PullRequestId,
    pub created_at: DateTime<Local>,
    pub merged_at: DateTime<Local>,
    /// `merged_at - created_at`. Negative when the source data has clock skew.
    pub duration: Duration,
    pub submitter: String,
    pub repository: String,
}

impl NormalizedPullRequest {
    pub fn new(
        id: PullRequestId,
        created_at: DateTime<Local>,
        merged_at: DateTime<Local>,
        submitter: String,
        repository: String,
    ) -> Self {
        Self {
            id,
            created_at,
            merged_at,
            duration: merged_at - created_at,
            submitter,
            repository,
        }
    }

    /// Created and merged on the same local calendar day
    pub fn merged_same_day(&self) -> bool {
        self.created_at.date_naive() == self.merged_at.date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Drop PRs opened on a weekend or outside 07:00-17:59 local time
    pub working_hours_only: bool,
}

fn within_working_hours(created_at: &DateTime<Local>) -> bool {
    let weekend = matches!(created_at.weekday(), Weekday::Sat | Weekday::Sun);
    let hour = created_at.hour();
    !weekend && 6 < hour && hour < 18
}

/// Turn raw API records into merged, de-duplicated, local-time records.
///
/// Unmerged PRs are dropped, as is any PR whose id was already seen earlier
/// in `raw`. Output keeps input order.
pub fn normalize(raw: &[RawPullRequest], options: NormalizeOptions) -> Vec<NormalizedPullRequest> {
    let mut seen: HashSet<&PullRequestId> = HashSet::new();
    let mut pulls = Vec::new();

    for pr in raw {
        let Some(merged_at) = pr.merged_at else {
            continue;
        };

        if !seen.insert(&pr.id) {
            debug!(id = %pr.id, "skipping duplicate pull request");
            continue;
        }

        let created_at = pr.created_at.with_timezone(&Local);
        let merged_at = merged_at.with_timezone(&Local);

        if options.working_hours_only && !within_working_hours(&created_at) {
            continue;
        }

        let normalized = NormalizedPullRequest::new(
            pr.id.clone(),
            created_at,
            merged_at,
            pr.author().to_string(),
            pr.repo().to_string(),
        );

        if normalized.duration < Duration::zero() {
            debug!(id = %pr.id, "merged before it was created; keeping negative duration");
        }

        pulls.push(normalized);
    }

    pulls
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(id: u64, created: &str, merged: Option<&str>) -> RawPullRequest {
        serde_json::from_value(crate::github::fake::fake_pr(
            id, created, merged, "octocat", "owner/repo",
        ))
        .unwrap()
    }

    fn utc(local: DateTime<Local>) -> String {
        local.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    #[test]
    fn test_duplicate_id_yields_one_record() {
        let input = vec![
            raw(1, "2023-01-02T10:00:00Z", Some("2023-01-03T10:00:00Z")),
            raw(1, "2023-01-02T10:00:00Z", Some("2023-01-03T10:00:00Z")),
        ];
        let result = normalize(&input, NormalizeOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration, Duration::days(1));
    }

    #[test]
    fn test_unmerged_is_dropped() {
        let input = vec![raw(1, "2023-01-02T10:00:00Z", None)];
        assert!(normalize(&input, NormalizeOptions::default()).is_empty());
    }

    #[test]
    fn test_unmerged_does_not_claim_id() {
        // The unmerged copy comes first; the merged one must still be kept
        let input = vec![
            raw(7, "2023-01-02T10:00:00Z", None),
            raw(7, "2023-01-02T10:00:00Z", Some("2023-01-02T12:00:00Z")),
        ];
        let result = normalize(&input, NormalizeOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration, Duration::hours(2));
    }

    #[test]
    fn test_order_preserved_and_fields_copied() {
        let input = vec![
            raw(3, "2023-01-05T10:00:00Z", Some("2023-01-05T11:00:00Z")),
            raw(2, "2023-01-04T10:00:00Z", None),
            raw(1, "2023-01-03T10:00:00Z", Some("2023-01-03T10:30:00Z")),
        ];
        let result = normalize(&input, NormalizeOptions::default());
        let ids: Vec<_> = result.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![PullRequestId::Number(3), PullRequestId::Number(1)]);
        assert_eq!(result[0].submitter, "octocat");
        assert_eq!(result[0].repository, "owner/repo");
        assert_eq!(
            result[0].created_at,
            Utc.with_ymd_and_hms(2023, 1, 5, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let input = vec![raw(1, "2023-01-03T10:00:00Z", Some("2023-01-02T10:00:00Z"))];
        let result = normalize(&input, NormalizeOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration, -Duration::days(1));
    }

    #[test]
    fn test_no_duplicates_and_all_merged_in_output() {
        let input: Vec<_> = (0..40u64)
            .map(|i| {
                let merged = if i % 3 == 0 { None } else { Some("2023-02-01T00:00:00Z") };
                raw(i % 17, "2023-01-31T00:00:00Z", merged)
            })
            .collect();
        let result = normalize(&input, NormalizeOptions::default());

        let ids: HashSet<_> = result.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), result.len());
        for pr in &result {
            assert!(input.iter().any(|r| r.id == pr.id && r.merged_at.is_some()));
        }
    }

    #[test]
    fn test_working_hours_filter() {
        // Monday 2023-01-02 and Saturday 2023-01-07, built in local time
        let monday_morning = Local.with_ymd_and_hms(2023, 1, 2, 9, 0, 0).unwrap();
        let monday_early = Local.with_ymd_and_hms(2023, 1, 2, 6, 30, 0).unwrap();
        let monday_evening = Local.with_ymd_and_hms(2023, 1, 2, 18, 0, 0).unwrap();
        let saturday = Local.with_ymd_and_hms(2023, 1, 7, 10, 0, 0).unwrap();
        let merged = utc(Local.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap());

        let input = vec![
            raw(1, &utc(monday_morning), Some(&merged)),
            raw(2, &utc(monday_early), Some(&merged)),
            raw(3, &utc(monday_evening), Some(&merged)),
            raw(4, &utc(saturday), Some(&merged)),
        ];

        let all = normalize(&input, NormalizeOptions::default());
        assert_eq!(all.len(), 4);

        let filtered = normalize(&input, NormalizeOptions { working_hours_only: true });
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, PullRequestId::Number(1));
    }

    #[test]
    fn test_merged_same_day_uses_local_date() {
        let created = Local.with_ymd_and_hms(2023, 3, 1, 9, 0, 0).unwrap();
        let same_day = Local.with_ymd_and_hms(2023, 3, 1, 17, 0, 0).unwrap();
        let next_day = Local.with_ymd_and_hms(2023, 3, 2, 8, 0, 0).unwrap();

        let pr = NormalizedPullRequest::new(
            PullRequestId::Number(1),
            created,
            same_day,
            "a".to_string(),
            "o/r".to_string(),
        );
        assert!(pr.merged_same_day());

        let pr = NormalizedPullRequest::new(
            PullRequestId::Number(2),
            created,
            next_day,
            "a".to_string(),
            "o/r".to_string(),
        );
        assert!(!pr.merged_same_day());
    }
}
