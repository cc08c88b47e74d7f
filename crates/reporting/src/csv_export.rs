//! CSV export of a result table: header row, comma separated, no index
//! column. Cells are written so that loading the file again reproduces them.

use influence_core::{DashboardError, DashboardResult, Table};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn write_csv<W: Write>(table: &Table, writer: W) -> DashboardResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns()).map_err(csv_error)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &Table) -> DashboardResult<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| DashboardError::Report(e.to_string()))
}

pub fn export_csv(table: &Table, path: &Path) -> DashboardResult<()> {
    write_csv(table, File::create(path)?)?;
    info!(path = %path.display(), rows = table.len(), "CSV exported");
    Ok(())
}

fn csv_error(err: csv::Error) -> DashboardError {
    DashboardError::Report(format!("CSV write failed: {err}"))
}
