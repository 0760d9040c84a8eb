use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How pull requests are bucketed for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
pub enum GroupMode {
    /// Submitter login
    #[default]
    #[value(name = "user")]
    #[serde(rename = "user")]
    User,
    /// First 8 hex chars of the MD5 of the submitter login
    #[value(name = "user:hashed")]
    #[serde(rename = "user:hashed")]
    UserHashed,
    /// Repository full name
    #[value(name = "repo")]
    #[serde(rename = "repo")]
    Repo,
    /// Local hour the PR was opened, "00"-"23"
    #[value(name = "hour")]
    #[serde(rename = "hour")]
    Hour,
    /// Local weekday the PR was opened
    #[value(name = "weekday")]
    #[serde(rename = "weekday")]
    Weekday,
    /// Local month the PR was opened, "YYYY-MM"
    #[value(name = "month")]
    #[serde(rename = "month")]
    Month,
}

impl GroupMode {
    pub const ALL: [GroupMode; 6] = [
        GroupMode::User,
        GroupMode::UserHashed,
        GroupMode::Repo,
        GroupMode::Hour,
        GroupMode::Weekday,
        GroupMode::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupMode::User => "user",
            GroupMode::UserHashed => "user:hashed",
            GroupMode::Repo => "repo",
            GroupMode::Hour => "hour",
            GroupMode::Weekday => "weekday",
            GroupMode::Month => "month",
        }
    }

    /// Column title for the group key
    pub fn label(&self) -> &'static str {
        match self {
            GroupMode::User => "User",
            GroupMode::UserHashed => "User:Hashed",
            GroupMode::Repo => "Repo",
            GroupMode::Hour => "Hour",
            GroupMode::Weekday => "Weekday",
            GroupMode::Month => "Month",
        }
    }

    /// Modes whose groups are listed smallest first rather than by key
    pub fn orders_by_size(&self) -> bool {
        matches!(self, GroupMode::User | GroupMode::UserHashed | GroupMode::Repo)
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown grouping mode '{}'. Expected one of: user, user:hashed, repo, hour, weekday, month",
                    s
                )
            })
    }
}
