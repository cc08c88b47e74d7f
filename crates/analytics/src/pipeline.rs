//! The whole dashboard as one pure function: validated uploads plus filter
//! selections in, every table and metric the dashboard shows out.
//!
//! Hosts call [`compute`] again on every interaction; nothing is cached.

use crate::aggregator::{self, DashboardOverview, Ranking};
use crate::filter::{self, FilterOptions, FilterSelection};
use crate::loader::DatasetUploads;
use crate::validator;
use influence_core::config::MetricsConfig;
use influence_core::{DashboardResult, Table};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The three insight lists shared by the screen and the PDF summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub top_influencers: Ranking,
    pub best_personas: Ranking,
    /// `None` when ROAS was not available on the filtered tracking table.
    pub poor_roas: Option<Ranking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResults {
    pub overview: DashboardOverview,
    pub filter_options: FilterOptions,
    pub filtered_influencers: Table,
    /// Filtered tracking rows including the derived spend columns; this is
    /// what the CSV export writes.
    pub filtered_tracking: Table,
    pub post_performance: Table,
    pub influencer_performance: Table,
    pub campaign_roi: Table,
    pub insights: Insights,
    pub payouts: Table,
}

/// Validate, filter, and aggregate. Any missing upload, schema mismatch, or
/// bad configuration aborts the run with no partial output.
pub fn compute(
    uploads: DatasetUploads,
    selection: &FilterSelection,
    metrics: &MetricsConfig,
) -> DashboardResult<DashboardResults> {
    let datasets = validator::validate(uploads)?;
    metrics.validate()?;
    info!(
        influencers = datasets.influencers.len(),
        posts = datasets.posts.len(),
        tracking = datasets.tracking.len(),
        payouts = datasets.payouts.len(),
        "Datasets validated"
    );

    let filter_options = FilterOptions::observe(&datasets.influencers, &datasets.tracking);

    let post_performance = aggregator::post_performance(&datasets.posts);
    let influencer_performance = aggregator::influencer_performance(&datasets.tracking);

    let tracking = aggregator::derive_metrics(&datasets.tracking, metrics.ad_spend_rate);
    let campaign_roi = aggregator::campaign_roi_summary(&tracking);

    let views = filter::apply(&datasets.influencers, &tracking, selection);

    let insights = Insights {
        top_influencers: aggregator::top_influencers_by_revenue(&views.tracking, metrics.top_n),
        best_personas: aggregator::best_personas_by_category(&views.tracking, &datasets.influencers),
        poor_roas: aggregator::worst_roas_influencers(&views.tracking, metrics.worst_roas_n),
    };
    let overview = aggregator::overview(&views.influencers, &datasets.posts, &views.tracking);

    info!(
        filtered_influencers = views.influencers.len(),
        filtered_tracking = views.tracking.len(),
        campaigns = campaign_roi.len(),
        "Dashboard computed"
    );

    Ok(DashboardResults {
        overview,
        filter_options,
        filtered_influencers: views.influencers,
        filtered_tracking: views.tracking,
        post_performance,
        influencer_performance,
        campaign_roi,
        insights,
        payouts: datasets.payouts,
    })
}
