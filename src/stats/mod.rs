mod summary;

pub use summary::{summarize, GroupStatistics};
