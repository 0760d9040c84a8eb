mod engine;
mod mode;

pub use engine::{group, group_key, Group};
pub use mode::GroupMode;
