use crate::types::DatasetKind;
use std::collections::BTreeSet;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(
        "Please upload all required CSV files to view the dashboard. Missing: {}",
        label_list(.missing)
    )]
    MissingInput { missing: Vec<DatasetKind> },

    #[error("{dataset} is missing required columns: {}", brace_list(.missing))]
    Schema {
        dataset: DatasetKind,
        missing: BTreeSet<String>,
        found: Vec<String>,
    },

    #[error("Failed to parse {dataset}: {message}")]
    Parse {
        dataset: DatasetKind,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report rendering error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn label_list(kinds: &[DatasetKind]) -> String {
    kinds
        .iter()
        .map(DatasetKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn brace_list(names: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("{{{}}}", quoted.join(", "))
}
