//! Influence Dashboard: influencer campaign analytics from four CSV uploads.
//!
//! Loads the uploads, applies the filter selections, prints the dashboard,
//! and optionally writes the filtered tracking CSV and the PDF summary.

use clap::{Parser, ValueEnum};
use influence_analytics::loader::{self, DatasetUploads};
use influence_analytics::{compute, FilterSelection, Selection};
use influence_core::config::AppConfig;
use influence_core::{DashboardError, DashboardResult, DatasetKind};
use influence_reporting::{export_csv, export_pdf, render_dashboard, InsightSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "influence-dashboard")]
#[command(about = "Influencer campaign analytics dashboard over CSV uploads")]
#[command(version)]
struct Cli {
    /// Influencers CSV
    #[arg(long)]
    influencers: Option<PathBuf>,

    /// Posts CSV
    #[arg(long)]
    posts: Option<PathBuf>,

    /// Tracking data CSV
    #[arg(long)]
    tracking: Option<PathBuf>,

    /// Payouts CSV
    #[arg(long)]
    payouts: Option<PathBuf>,

    /// Keep only these influencer categories (repeatable; default: all)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Keep only these influencer platforms (repeatable; default: all)
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Keep only these brands/products (repeatable; default: all)
    #[arg(long = "brand")]
    brands: Vec<String>,

    /// Write the filtered tracking CSV here
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Write the PDF insight summary here
    #[arg(long)]
    pdf_out: Option<PathBuf>,

    /// Write both exports into this directory under their configured names
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Spend per order (overrides config)
    #[arg(long, env = "INFLUENCE_DASHBOARD__METRICS__AD_SPEND_RATE")]
    ad_spend_rate: Option<f64>,

    /// Number of top influencers listed (overrides config)
    #[arg(long)]
    top_n: Option<usize>,

    /// TOML config file
    #[arg(long, env = "INFLUENCE_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn selection(values: Vec<String>) -> Selection {
    if values.is_empty() {
        Selection::All
    } else {
        Selection::only(values)
    }
}

fn load_uploads(cli: &Cli) -> DashboardResult<DatasetUploads> {
    Ok(DatasetUploads {
        influencers: loader::load_path(DatasetKind::Influencers, cli.influencers.as_deref())?,
        posts: loader::load_path(DatasetKind::Posts, cli.posts.as_deref())?,
        tracking: loader::load_path(DatasetKind::Tracking, cli.tracking.as_deref())?,
        payouts: loader::load_path(DatasetKind::Payouts, cli.payouts.as_deref())?,
    })
}

fn report_failure(err: &DashboardError) {
    eprintln!("{err}");
    if let DashboardError::Schema { found, .. } = err {
        eprintln!("Columns found: {found:?}");
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "influence_dashboard=info,influence_analytics=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(rate) = cli.ad_spend_rate {
        config.metrics.ad_spend_rate = rate;
    }
    if let Some(top_n) = cli.top_n {
        config.metrics.top_n = top_n;
    }

    info!(
        ad_spend_rate = config.metrics.ad_spend_rate,
        top_n = config.metrics.top_n,
        worst_roas_n = config.metrics.worst_roas_n,
        "Configuration loaded"
    );

    let filters = FilterSelection {
        categories: selection(cli.categories.clone()),
        platforms: selection(cli.platforms.clone()),
        brands: selection(cli.brands.clone()),
    };

    let outcome = load_uploads(&cli).and_then(|uploads| compute(uploads, &filters, &config.metrics));
    let results = match outcome {
        Ok(results) => results,
        Err(err) => {
            error!(error = %err, "Dashboard not rendered");
            report_failure(&err);
            return Ok(ExitCode::FAILURE);
        }
    };

    match cli.format {
        OutputFormat::Text => print!("{}", render_dashboard(&results, &config.report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    let csv_path = cli
        .csv_out
        .or_else(|| cli.export_dir.as_ref().map(|d| d.join(&config.export.csv_file_name)));
    if let Some(path) = csv_path {
        export_csv(&results.filtered_tracking, &path)?;
    }

    let pdf_path = cli
        .pdf_out
        .or_else(|| cli.export_dir.as_ref().map(|d| d.join(&config.export.pdf_file_name)));
    if let Some(path) = pdf_path {
        let summary = InsightSummary::from_insights(&results.insights, &config.report.title);
        export_pdf(&summary, &path)?;
        info!(
            generated_at = %summary.generated_at,
            sections = summary.sections.len(),
            "Insight summary written"
        );
    }

    Ok(ExitCode::SUCCESS)
}
