mod normalize;

pub use normalize::{normalize, NormalizeOptions, NormalizedPullRequest};
