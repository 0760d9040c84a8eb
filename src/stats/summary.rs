use chrono::Duration;

use crate::pulls::NormalizedPullRequest;

/// Time-to-merge figures for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    pub count: usize,
    /// Element at `count / 2` of the sorted durations; for even counts this
    /// is the upper of the two middle values, not their average.
    pub median_duration: Duration,
    pub mean_duration: Duration,
    pub merged_same_day_count: usize,
    /// 0-100, unrounded
    pub merged_same_day_percent: f64,
}

/// Summarize a non-empty group.
///
/// Negative durations (clock skew in the source data) are included as-is and
/// will pull the median and mean down.
///
/// # Panics
///
/// Panics if `records` is empty. Grouping never produces empty groups.
pub fn summarize(records: &[NormalizedPullRequest]) -> GroupStatistics {
    assert!(!records.is_empty(), "summarize called on an empty group");

    let count = records.len();

    let mut durations: Vec<Duration> = records.iter().map(|pr| pr.duration).collect();
    durations.sort();
    let median_duration = durations[count / 2];

    let total_ms: i64 = durations.iter().map(|d| d.num_milliseconds()).sum();
    let mean_duration = Duration::milliseconds(total_ms / count as i64);

    let merged_same_day_count = records.iter().filter(|pr| pr.merged_same_day()).count();
    let merged_same_day_percent = merged_same_day_count as f64 / count as f64 * 100.0;

    GroupStatistics {
        count,
        median_duration,
        mean_duration,
        merged_same_day_count,
        merged_same_day_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::PullRequestId;
    use chrono::{Local, TimeZone};

    fn pr_with(id: u64, created_day: u32, duration: Duration) -> NormalizedPullRequest {
        let created = Local.with_ymd_and_hms(2023, 1, created_day, 9, 0, 0).unwrap();
        NormalizedPullRequest::new(
            PullRequestId::Number(id),
            created,
            created + duration,
            "octocat".to_string(),
            "owner/repo".to_string(),
        )
    }

    #[test]
    fn test_median_and_mean_of_three() {
        let group = vec![
            pr_with(1, 2, Duration::days(3)),
            pr_with(2, 2, Duration::days(1)),
            pr_with(3, 2, Duration::days(2)),
        ];
        let stats = summarize(&group);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.median_duration, Duration::days(2));
        assert_eq!(stats.mean_duration, Duration::days(2));
    }

    #[test]
    fn test_median_even_count_takes_upper_middle() {
        let group = vec![
            pr_with(1, 2, Duration::hours(1)),
            pr_with(2, 2, Duration::hours(2)),
            pr_with(3, 2, Duration::hours(4)),
            pr_with(4, 2, Duration::hours(8)),
        ];
        let stats = summarize(&group);
        assert_eq!(stats.median_duration, Duration::hours(4));
        assert_eq!(stats.mean_duration, Duration::minutes(225));
    }

    #[test]
    fn test_merged_same_day_percent() {
        // Created at 09:00; two merge within the hour, three merge days later
        let group = vec![
            pr_with(1, 2, Duration::minutes(30)),
            pr_with(2, 3, Duration::hours(2)),
            pr_with(3, 4, Duration::days(2)),
            pr_with(4, 5, Duration::days(3)),
            pr_with(5, 6, Duration::days(4)),
        ];
        let stats = summarize(&group);
        assert_eq!(stats.merged_same_day_count, 2);
        assert!((stats.merged_same_day_percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_matches_group_length() {
        for n in 1..=7u64 {
            let group: Vec<_> = (1..=n)
                .map(|i| pr_with(i, 2, Duration::hours(i as i64)))
                .collect();
            assert_eq!(summarize(&group).count, group.len());
        }
    }

    #[test]
    fn test_single_record() {
        let stats = summarize(&[pr_with(1, 2, Duration::hours(5))]);
        assert_eq!(stats.median_duration, Duration::hours(5));
        assert_eq!(stats.mean_duration, Duration::hours(5));
        assert!((stats.merged_same_day_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_duration_tolerated() {
        let group = vec![
            pr_with(1, 3, -Duration::hours(2)),
            pr_with(2, 3, Duration::hours(4)),
        ];
        let stats = summarize(&group);
        assert_eq!(stats.median_duration, Duration::hours(4));
        assert_eq!(stats.mean_duration, Duration::hours(1));
    }

    #[test]
    #[should_panic(expected = "empty group")]
    fn test_empty_group_panics() {
        summarize(&[]);
    }
}
