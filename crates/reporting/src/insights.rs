//! Insight summary document: the text content of the PDF export.

use chrono::{DateTime, Utc};
use influence_analytics::aggregator::{RankedEntry, Ranking};
use influence_analytics::Insights;
use influence_core::Cell;
use serde::{Deserialize, Serialize};

pub const TOP_INFLUENCERS_HEADING: &str = "Top Influencers by Revenue";
pub const BEST_PERSONAS_HEADING: &str = "Best Personas (by Category Revenue)";
pub const POOR_ROAS_HEADING: &str = "Influencers with Poor ROAS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSection {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub title: String,
    pub sections: Vec<InsightSection>,
    pub generated_at: DateTime<Utc>,
}

impl InsightSummary {
    /// Build the summary. The poor-ROAS section is left out entirely when
    /// it was not computed.
    pub fn from_insights(insights: &Insights, title: &str) -> Self {
        let mut sections = vec![
            section(TOP_INFLUENCERS_HEADING, &insights.top_influencers, |entry| {
                format!("Influencer ID: {} | Revenue: {}", entry.key, entry.value)
            }),
            section(BEST_PERSONAS_HEADING, &insights.best_personas, |entry| {
                format!("Category: {} | Avg Revenue: {}", entry.key, two_decimals(&entry.value))
            }),
        ];
        if let Some(poor_roas) = &insights.poor_roas {
            sections.push(section(POOR_ROAS_HEADING, poor_roas, |entry| {
                format!("Influencer ID: {} | ROAS: {}", entry.key, two_decimals(&entry.value))
            }));
        }

        Self {
            title: title.to_string(),
            sections,
            generated_at: Utc::now(),
        }
    }

    pub fn section(&self, heading: &str) -> Option<&InsightSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Plain-text rendering: title, then each section heading followed by
    /// its lines.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.heading);
            out.push('\n');
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

fn section<F>(heading: &str, ranking: &Ranking, line: F) -> InsightSection
where
    F: Fn(&RankedEntry) -> String,
{
    InsightSection {
        heading: heading.to_string(),
        lines: ranking.entries.iter().map(line).collect(),
    }
}

fn two_decimals(value: &Cell) -> String {
    match value.as_f64() {
        Some(v) => format!("{v:.2}"),
        None => String::from("NaN"),
    }
}
