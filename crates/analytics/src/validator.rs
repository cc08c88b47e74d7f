//! Validator: presence check across all four uploads, then a required
//! column check per dataset. The first failure halts the run.

use crate::loader::DatasetUploads;
use influence_core::{DashboardError, DashboardResult, DatasetKind, Schema, Table};
use tracing::{debug, warn};

/// All four datasets, present and schema-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDatasets {
    pub influencers: Table,
    pub posts: Table,
    pub tracking: Table,
    pub payouts: Table,
}

/// Check presence of every upload, then the Influencer, Post, and Tracking
/// schemas in that order. Payouts pass through as-is.
pub fn validate(uploads: DatasetUploads) -> DashboardResult<ValidatedDatasets> {
    let missing = uploads.missing();
    let DatasetUploads {
        influencers: Some(influencers),
        posts: Some(posts),
        tracking: Some(tracking),
        payouts: Some(payouts),
    } = uploads
    else {
        warn!(?missing, "Uploads incomplete, pipeline halted");
        return Err(DashboardError::MissingInput { missing });
    };

    let influencers = validate_table(DatasetKind::Influencers, influencers)?;
    let posts = validate_table(DatasetKind::Posts, posts)?;
    let tracking = validate_table(DatasetKind::Tracking, tracking)?;
    let payouts = validate_table(DatasetKind::Payouts, payouts)?;

    Ok(ValidatedDatasets {
        influencers,
        posts,
        tracking,
        payouts,
    })
}

/// Check one table against the schema for its role. Posts and Tracking
/// get their column names trimmed first.
pub fn validate_table(kind: DatasetKind, table: Table) -> DashboardResult<Table> {
    let Some(schema) = Schema::for_dataset(kind) else {
        return Ok(table);
    };

    let table = if schema.trim_column_names {
        table.with_trimmed_column_names()
    } else {
        table
    };

    let missing = schema.missing_columns(&table);
    if !missing.is_empty() {
        warn!(dataset = %kind, ?missing, "Required columns missing");
        return Err(DashboardError::Schema {
            dataset: kind,
            missing,
            found: table.columns().to_vec(),
        });
    }

    debug!(dataset = %kind, rows = table.len(), "Schema check passed");
    Ok(table)
}
