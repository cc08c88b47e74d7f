//! Terminal rendering of the dashboard: headline metrics, aligned result
//! tables, the insight lists, and the payout passthrough.

use crate::insights::{BEST_PERSONAS_HEADING, POOR_ROAS_HEADING, TOP_INFLUENCERS_HEADING};
use influence_analytics::aggregator::Ranking;
use influence_analytics::DashboardResults;
use influence_core::config::ReportConfig;
use influence_core::{Cell, Table};
use std::fmt::Write;

const RULE: &str = "---";

pub fn render_dashboard(results: &DashboardResults, config: &ReportConfig) -> String {
    let mut out = String::new();
    let overview = &results.overview;

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Total Influencers: {}", overview.total_influencers);
    let _ = writeln!(out, "Total Posts: {}", overview.total_posts);
    let _ = writeln!(
        out,
        "Total Revenue: {}",
        format_currency(overview.total_revenue.as_f64().unwrap_or(0.0), &config.currency_symbol)
    );
    let _ = writeln!(out, "{RULE}");

    render_section(&mut out, "Post Performance", &render_table(&results.post_performance));
    render_section(
        &mut out,
        "Influencer Performance",
        &render_table(&results.influencer_performance),
    );
    render_section(
        &mut out,
        "ROI & Incremental ROAS (average by campaign)",
        &render_table(&results.campaign_roi),
    );

    let insights = &results.insights;
    let mut insight_text = String::new();
    let _ = writeln!(insight_text, "{TOP_INFLUENCERS_HEADING}");
    insight_text.push_str(&render_ranking(&insights.top_influencers));
    let _ = writeln!(insight_text, "\n{BEST_PERSONAS_HEADING}");
    insight_text.push_str(&render_ranking(&insights.best_personas));
    if let Some(poor_roas) = &insights.poor_roas {
        let _ = writeln!(insight_text, "\n{POOR_ROAS_HEADING}");
        insight_text.push_str(&render_ranking(poor_roas));
    }
    render_section(&mut out, "Insights", &insight_text);

    render_section(&mut out, "Payout Tracking", &render_table(&results.payouts));
    out
}

fn render_section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "{title}");
    out.push_str(body);
    let _ = writeln!(out, "{RULE}");
}

/// Left-aligned text columns separated by two spaces.
pub fn render_table(table: &Table) -> String {
    let rendered: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.chars().count()).collect();
    for row in &rendered {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_aligned(&mut out, table.columns(), &widths);
    for row in &rendered {
        push_aligned(&mut out, row, &widths);
    }
    if table.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn push_aligned(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_ranking(ranking: &Ranking) -> String {
    let mut table = Table::new(vec![ranking.key_column.clone(), ranking.metric.clone()]);
    for entry in &ranking.entries {
        table.push_row(vec![entry.key.clone(), entry.value.clone()]);
    }
    render_table(&table)
}

/// Screen form of a cell; floats are shown to two decimals.
fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Float(value) if value.is_finite() => format!("{value:.2}"),
        other => other.to_string(),
    }
}

/// Currency with thousands separators and no decimals, e.g. `₹1,234,568`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{symbol}{value}");
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}")
}
