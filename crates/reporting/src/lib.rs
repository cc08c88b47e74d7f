//! Report emitters for the influencer dashboard: terminal tables, CSV
//! export of the filtered tracking data, and the PDF insight summary.

pub mod csv_export;
pub mod dashboard;
pub mod insights;
pub mod pdf;

pub use csv_export::{export_csv, to_csv_string, write_csv};
pub use dashboard::render_dashboard;
pub use insights::InsightSummary;
pub use pdf::{export_pdf, render_pdf};
