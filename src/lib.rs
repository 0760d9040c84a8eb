//! Time-to-merge statistics for GitHub pull requests.
//!
//! The pipeline is: fetch (`github`) → normalize (`pulls`) → group
//! (`grouping`) → summarize (`stats`), tied together by `report` and rendered
//! by `output`.

pub mod config;
pub mod credentials;
pub mod github;
pub mod grouping;
pub mod output;
pub mod pulls;
pub mod report;
pub mod stats;
