use std::collections::BTreeMap;

use super::mode::GroupMode;
use crate::pulls::NormalizedPullRequest;

/// Canonical weekday ordering; `%A` yields these names
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Pull requests sharing a key. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub records: Vec<NormalizedPullRequest>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The key `pr` falls under for `mode`. Time-based keys use local creation time.
pub fn group_key(pr: &NormalizedPullRequest, mode: GroupMode) -> String {
    match mode {
        GroupMode::User => pr.submitter.clone(),
        GroupMode::UserHashed => {
            let digest = format!("{:x}", md5::compute(pr.submitter.as_bytes()));
            digest[..8].to_string()
        }
        GroupMode::Repo => pr.repository.clone(),
        GroupMode::Hour => pr.created_at.format("%H").to_string(),
        GroupMode::Weekday => pr.created_at.format("%A").to_string(),
        GroupMode::Month => pr.created_at.format("%Y-%m").to_string(),
    }
}

fn weekday_position(key: &str) -> usize {
    WEEKDAYS
        .iter()
        .position(|day| *day == key)
        .unwrap_or(WEEKDAYS.len())
}

/// Partition `records` into groups for `mode`.
///
/// Every record lands in exactly one group and keeps its relative order.
/// Ordering of the groups:
/// - user, user:hashed, repo: smallest group first, ties by key ascending
/// - hour, month: key ascending
/// - weekday: Monday through Sunday
pub fn group(records: &[NormalizedPullRequest], mode: GroupMode) -> Vec<Group> {
    let mut buckets: BTreeMap<String, Vec<NormalizedPullRequest>> = BTreeMap::new();
    for pr in records {
        buckets
            .entry(group_key(pr, mode))
            .or_default()
            .push(pr.clone());
    }

    // BTreeMap iteration already gives key order
    let mut groups: Vec<Group> = buckets
        .into_iter()
        .map(|(key, records)| Group { key, records })
        .collect();

    if mode.orders_by_size() {
        // Stable sort keeps key order among equal sizes
        groups.sort_by_key(|g| g.len());
    } else if mode == GroupMode::Weekday {
        groups.sort_by_key(|g| weekday_position(&g.key));
    }

    groups
}
