pub mod formatter;

pub use formatter::{
    columns, format_csv, format_duration, format_table, render, should_use_colors, OutputFormat,
};
