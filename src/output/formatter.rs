use anyhow::{Context, Result};
use chrono::Duration;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::grouping::GroupMode;
use crate::report::ReportRow;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
}

/// Header row: group label, count, same-day percentage, median, average
pub fn columns(mode: GroupMode) -> [&'static str; 5] {
    [
        mode.label(),
        "#",
        "% Merged Same Day",
        "Median to Merge",
        "Average to Merge",
    ]
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Human-readable duration using the two largest non-zero units,
/// e.g. "2 days, 3 hours" or "45 minutes, 10 seconds"
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total = duration.num_seconds().abs();

    let parts: Vec<String> = [
        (total / 86_400, "day"),
        (total % 86_400 / 3_600, "hour"),
        (total % 3_600 / 60, "minute"),
        (total % 60, "second"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .take(2)
    .map(|(n, unit)| plural(n, unit))
    .collect();

    if parts.is_empty() {
        return "0 seconds".to_string();
    }
    format!("{}{}", sign, parts.join(", "))
}

fn format_percent(percent: f64) -> String {
    format!("{:.2}", percent)
}

fn table_cells(row: &ReportRow) -> [String; 5] {
    [
        row.key.clone(),
        row.stats.count.to_string(),
        format_percent(row.stats.merged_same_day_percent),
        format_duration(row.stats.median_duration),
        format_duration(row.stats.mean_duration),
    ]
}

/// Bordered, left-aligned table
pub fn format_table(mode: GroupMode, rows: &[ReportRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No merged pull requests found.".to_string();
    }

    let header = columns(mode);
    let body: Vec<[String; 5]> = rows.iter().map(table_cells).collect();

    let mut widths: [usize; 5] = header.map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let line = |cells: &[String], bold: bool| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| {
                // Pad before styling so escape codes don't skew alignment
                let cell = format!("{:<width$}", cell, width = width);
                if bold {
                    cell.bold().to_string()
                } else {
                    cell
                }
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let mut out = vec![border.clone(), line(&header_cells[..], use_colors), border.clone()];
    for cells in &body {
        out.push(line(&cells[..], false));
    }
    out.push(border);
    out.join("\n")
}

/// CSV with a header row. Durations are whole seconds.
pub fn format_csv(mode: GroupMode, rows: &[ReportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns(mode))
        .context("Failed to write CSV header")?;

    for row in rows {
        writer
            .write_record([
                row.key.clone(),
                row.stats.count.to_string(),
                format_percent(row.stats.merged_same_day_percent),
                row.stats.median_duration.num_seconds().to_string(),
                row.stats.mean_duration.num_seconds().to_string(),
            ])
            .context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Render in the requested format
pub fn render(format: OutputFormat, mode: GroupMode, rows: &[ReportRow]) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(mode, rows, should_use_colors())),
        OutputFormat::Csv => format_csv(mode, rows),
    }
}
