//! Output rendering for fetch results.
//!
//! - **Report**: summary, insights, then the events table (default)
//! - **Summary**: the four summary lines only
//! - **Insights**: tsunami flags, magnitude mix, top locations and daily trend
//! - **Table**: the events table only
//! - **Json**: the full result set, pretty-printed

use seismic_core::{CanonicalEvent, Insights, ResultSet, Summary};

use crate::error::{ClientError, ClientResult};

/// Placeholder for a missing summary statistic.
const NOT_AVAILABLE: &str = "n/a";
/// Placeholder for a missing table cell.
const EMPTY_CELL: &str = "-";

const COLUMNS: [&str; 9] = [
    "id",
    "magnitude",
    "place",
    "time",
    "latitude",
    "longitude",
    "depth_km",
    "tsunami",
    "type",
];

/// The output format for a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Report,
    Summary,
    Insights,
    Table,
    Json,
}

/// Renders `result` in `format`, without a trailing newline.
pub fn render(result: &ResultSet, format: OutputFormat) -> ClientResult<String> {
    match format {
        OutputFormat::Report => Ok(format!(
            "{}\n\n{}\n\n{}",
            render_summary(&result.summary),
            render_insights(&Insights::from_events(&result.events)),
            render_table(&result.events)
        )),
        OutputFormat::Summary => Ok(render_summary(&result.summary)),
        OutputFormat::Insights => Ok(render_insights(&Insights::from_events(&result.events))),
        OutputFormat::Table => Ok(render_table(&result.events)),
        OutputFormat::Json => render_json(result),
    }
}

pub fn render_summary(summary: &Summary) -> String {
    [
        format!("Count: {}", summary.count),
        format!("Max magnitude: {}", stat(summary.max_magnitude)),
        format!("Min magnitude: {}", stat(summary.min_magnitude)),
        format!("Avg magnitude: {}", stat(summary.avg_magnitude)),
    ]
    .join("\n")
}

/// Renders events as an aligned text table. No events gives the header only.
pub fn render_table(events: &[CanonicalEvent]) -> String {
    let rows: Vec<[String; 9]> = events.iter().map(row).collect();
    aligned(COLUMNS, &rows)
}

/// Renders the dashboard breakdowns as titled sections.
pub fn render_insights(insights: &Insights) -> String {
    let mix: Vec<[String; 3]> = insights
        .magnitude_mix
        .iter()
        .map(|b| {
            [
                b.band.label().to_string(),
                b.count.to_string(),
                format!("{}%", b.percent),
            ]
        })
        .collect();
    let places: Vec<[String; 2]> = insights
        .top_places
        .iter()
        .map(|p| [p.place.clone(), p.count.to_string()])
        .collect();
    let days: Vec<[String; 2]> = insights
        .daily_trend
        .iter()
        .map(|d| [d.day.to_string(), d.count.to_string()])
        .collect();

    [
        format!("Tsunami flags: {}", insights.tsunami_flags),
        format!("Magnitude mix\n{}", aligned(["band", "count", "share"], &mix)),
        format!("Top locations\n{}", aligned(["place", "count"], &places)),
        format!("Daily trend\n{}", aligned(["day", "count"], &days)),
    ]
    .join("\n\n")
}

pub fn render_json(result: &ResultSet) -> ClientResult<String> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ClientError::Render(format!("failed to serialize result: {}", e)))
}

fn stat(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn row(event: &CanonicalEvent) -> [String; 9] {
    [
        cell(Some(event.id.as_str()).filter(|id| !id.is_empty())),
        number(event.magnitude),
        cell(event.place.as_deref()),
        cell(event.time_iso().as_deref()),
        number(event.latitude),
        number(event.longitude),
        number(event.depth_km),
        event.tsunami.to_string(),
        cell(event.event_type.as_deref()),
    ]
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or(EMPTY_CELL).to_string()
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_CELL.to_string(), |v| v.to_string())
}

/// Lays out `rows` under `header` in columns, with a dashed rule between.
fn aligned<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(header.iter().copied(), &widths));
    lines.push(format_line(widths.iter().map(|w| "-".repeat(*w)), &widths));
    for row in rows {
        lines.push(format_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_line<S: AsRef<str>, const N: usize>(
    cells: impl Iterator<Item = S>,
    widths: &[usize; N],
) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}
