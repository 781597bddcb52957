use crate::aggregate::Overview;
use crate::error::ExportError;
use crate::table::{Table, TableRow};
use crate::types::{ChartData, ChartSeries, DashboardSummary, Icon, MetricRow, OverviewMetric, SeriesRow};
use crate::util::{format_int, format_number};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table as TextTable, Tabled};
use tracing::info;

/// Widest bar drawn next to a chart category.
const BAR_WIDTH: usize = 30;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

fn markdown<T: Tabled>(rows: Vec<T>) -> String {
    TextTable::new(rows).with(Style::markdown()).to_string()
}

pub fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Car => "🚗",
        Icon::Battery => "🔋",
        Icon::Bolt => "⚡",
        Icon::Industry => "🏭",
    }
}

pub fn render_overview(metrics: &[OverviewMetric]) -> String {
    let rows: Vec<MetricRow> = metrics
        .iter()
        .map(|m| MetricRow {
            icon: icon_glyph(m.icon).to_string(),
            title: m.title.to_string(),
            value: m.value.clone(),
        })
        .collect();
    markdown(rows)
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    // Round up so any non-zero count stays visible.
    "█".repeat((count * BAR_WIDTH).div_ceil(max))
}

pub fn render_chart(series: &ChartSeries) -> String {
    let mut out = format!("{}\n\n", series.kind.title());
    let total = series.total();
    if series.points.is_empty() || total == 0 {
        out.push_str("(no data)\n");
        return out;
    }
    let max = series.points.iter().map(|p| p.count).max().unwrap_or(0);
    let rows: Vec<SeriesRow> = series
        .points
        .iter()
        .map(|p| SeriesRow {
            category: p.category.clone(),
            count: format_int(p.count),
            share: format!("{}%", format_number(p.count as f64 / total as f64 * 100.0, 1)),
            bar: bar(p.count, max),
        })
        .collect();
    out.push_str(&markdown(rows));
    out.push('\n');
    out
}

pub fn render_charts(charts: &ChartData) -> String {
    charts
        .series()
        .iter()
        .map(|s| render_chart(s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the current page of a table with its navigation footer.
pub fn render_table<T: TableRow>(table: &Table<'_, T>) -> String {
    let view = table.derive();
    let state = table.state();
    let columns = table.columns();

    let mut out = format!("{}\n", table.title());
    if !state.search.is_empty() {
        out.push_str(&format!("Search: \"{}\"\n", state.search));
    }
    out.push('\n');

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|col| match state.sort {
        Some((key, order)) if key == col.key => format!("{} {}", col.label, order.indicator()),
        _ => col.label.to_string(),
    }));
    if view.rows.is_empty() {
        builder.push_record(
            std::iter::once("No results found".to_string())
                .chain(std::iter::repeat(String::new()).take(columns.len().saturating_sub(1))),
        );
    }
    for row in &view.rows {
        builder.push_record(
            columns
                .iter()
                .map(|col| row.cell(col.key).unwrap_or_default().into_owned()),
        );
    }
    out.push_str(&builder.build().with(Style::markdown()).to_string());
    out.push_str("\n\n");

    let mut controls: Vec<String> = Vec::new();
    if view.has_prev() {
        controls.push("< Prev".to_string());
    }
    for n in &view.page_numbers {
        if *n == view.page {
            controls.push(format!("[{}]", n));
        } else {
            controls.push(n.to_string());
        }
    }
    if view.has_next() {
        controls.push("Next >".to_string());
    }
    out.push_str(&format!(
        "Rows per page: {} | {} | Page {} of {} ({} matching)\n",
        state.rows_per_page.get(),
        controls.join(" "),
        view.page,
        view.total_pages,
        format_int(view.filtered_len),
    ));
    out
}

/// Write `ev_summary.json` plus one CSV per chart series into `dir`.
pub fn export_summary(
    dir: &Path,
    overview: &Overview,
    charts: &ChartData,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let summary = DashboardSummary {
        generated_at: Utc::now(),
        overview: overview.metrics(),
        charts: charts.clone(),
    };
    let json_path = dir.join("ev_summary.json");
    write_json(&json_path, &summary)?;
    written.push(json_path);

    for series in charts.series() {
        let path = dir.join(format!("{}.csv", series.kind.file_stem()));
        write_csv(&path, &series.points)?;
        written.push(path);
    }
    info!(files = written.len(), dir = %dir.display(), "exported summary");
    Ok(written)
}
