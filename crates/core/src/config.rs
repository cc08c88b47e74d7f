use serde::Deserialize;
use std::path::Path;

use crate::error::{DashboardError, DashboardResult};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `INFLUENCE_DASHBOARD__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Modeled spend per order used for `ad_spend`.
    #[serde(default = "default_ad_spend_rate")]
    pub ad_spend_rate: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_worst_roas_n")]
    pub worst_roas_n: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_title")]
    pub title: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_csv_file_name")]
    pub csv_file_name: String,
    #[serde(default = "default_pdf_file_name")]
    pub pdf_file_name: String,
}

// Default functions
fn default_ad_spend_rate() -> f64 {
    50.0
}
fn default_top_n() -> usize {
    5
}
fn default_worst_roas_n() -> usize {
    5
}
fn default_report_title() -> String {
    "HealthKart Influencer Campaign Insights Summary".to_string()
}
fn default_currency_symbol() -> String {
    "\u{20b9}".to_string()
}
fn default_csv_file_name() -> String {
    "filtered_tracking.csv".to_string()
}
fn default_pdf_file_name() -> String {
    "insights_summary.pdf".to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            ad_spend_rate: default_ad_spend_rate(),
            top_n: default_top_n(),
            worst_roas_n: default_worst_roas_n(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_file_name: default_csv_file_name(),
            pdf_file_name: default_pdf_file_name(),
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if !self.ad_spend_rate.is_finite() || self.ad_spend_rate < 0.0 {
            return Err(DashboardError::Config(format!(
                "ad_spend_rate must be a finite non-negative number, got {}",
                self.ad_spend_rate
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from an optional config file, then environment
    /// variables (which take precedence).
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("INFLUENCE_DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
