//! Influencer campaign analytics: CSV loading, schema validation, filtering,
//! and the group-by aggregations behind the dashboard.

pub mod aggregator;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod validator;

pub use filter::{FilterOptions, FilterSelection, Selection};
pub use loader::DatasetUploads;
pub use pipeline::{compute, DashboardResults, Insights};
pub use validator::ValidatedDatasets;
