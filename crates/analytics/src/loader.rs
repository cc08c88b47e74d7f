//! CSV loader: turns uploaded byte streams into typed in-memory tables.
//! Schema is not checked here; that is the validator's job.

use influence_core::{Cell, ColumnType, DashboardError, DashboardResult, DatasetKind, Schema, Table};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// The four uploads a dashboard run needs. Any of them may be absent at
/// the boundary; the validator refuses to proceed until all are present.
#[derive(Debug, Clone, Default)]
pub struct DatasetUploads {
    pub influencers: Option<Table>,
    pub posts: Option<Table>,
    pub tracking: Option<Table>,
    pub payouts: Option<Table>,
}

impl DatasetUploads {
    pub fn get(&self, kind: DatasetKind) -> Option<&Table> {
        match kind {
            DatasetKind::Influencers => self.influencers.as_ref(),
            DatasetKind::Posts => self.posts.as_ref(),
            DatasetKind::Tracking => self.tracking.as_ref(),
            DatasetKind::Payouts => self.payouts.as_ref(),
        }
    }

    /// Datasets that have not been uploaded, in validation order.
    pub fn missing(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }
}

/// Parse an optional upload. `None` in means `None` out.
pub fn load_dataset<R: Read>(kind: DatasetKind, source: Option<R>) -> DashboardResult<Option<Table>> {
    source.map(|reader| parse_csv(kind, reader)).transpose()
}

/// Load an optional file path.
pub fn load_path(kind: DatasetKind, path: Option<&Path>) -> DashboardResult<Option<Table>> {
    let Some(path) = path else {
        debug!(dataset = %kind, "No upload provided");
        return Ok(None);
    };
    let file = File::open(path)?;
    let table = parse_csv(kind, file)?;
    info!(
        dataset = %kind,
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Dataset loaded"
    );
    Ok(Some(table))
}

/// Parse a CSV stream with a header row. Ragged rows and invalid UTF-8
/// are parse errors.
///
/// Each column gets one storage type: text and date fields of the dataset
/// schema are always text, any other column is integer or float only when
/// every non-empty field parses that way.
pub fn parse_csv<R: Read>(kind: DatasetKind, reader: R) -> DashboardResult<Table> {
    let parse_error = |message: String| DashboardError::Parse {
        dataset: kind,
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(parse_error("no columns to parse from file".to_string()));
    }

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()
        .map_err(|e| parse_error(e.to_string()))?;

    let schema = Schema::for_dataset(kind);
    let column_types: Vec<ColumnType> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            schema
                .and_then(|s| s.field(header.trim()))
                .and_then(|field| field.kind.pinned_type())
                .unwrap_or_else(|| {
                    ColumnType::infer(records.iter().map(|record| record.get(idx).unwrap_or("")))
                })
        })
        .collect();
    debug!(dataset = %kind, ?column_types, "Column types inferred");

    let mut table = Table::new(headers);
    for record in &records {
        table.push_row(
            record
                .iter()
                .zip(&column_types)
                .map(|(raw, column_type)| Cell::parse_as(raw, *column_type))
                .collect(),
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_infers_column_types() {
        let data = "ID,name,follower_count,score\n1,Asha,12000,4.5\n2,Ravi,,n/a\n";
        let table = parse_csv(DatasetKind::Influencers, data.as_bytes()).unwrap();

        assert_eq!(table.columns(), ["ID", "name", "follower_count", "score"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], vec![Cell::Int(1), "Asha".into(), Cell::Int(12000), "4.5".into()]);
        assert_eq!(table.rows()[1][2], Cell::Null);
        assert_eq!(table.rows()[1][3], Cell::Text("n/a".into()));
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let data = "source,campaign,influencer_id,user_id,product,date,orders,revenue\n\
                    ig,launch,1,007,007,2025-01-03,2,150\n\
                    ig,launch,2,u2,Infinity,2025-01-04,1,99.5\n\
                    yt,launch,3,u3,Gritzo,2025-01-05,,inf\n";
        let table = parse_csv(DatasetKind::Tracking, data.as_bytes()).unwrap();

        assert_eq!(
            table.column("product"),
            [&Cell::from("007"), &Cell::from("Infinity"), &Cell::from("Gritzo")]
        );
        assert_eq!(table.rows()[0][3], Cell::from("007"));
        assert_eq!(table.rows()[0][6], Cell::Int(2));
        assert_eq!(table.rows()[2][6], Cell::Null);
        assert_eq!(
            table.column("revenue"),
            [&Cell::Float(150.0), &Cell::Float(99.5), &Cell::Float(f64::INFINITY)]
        );
    }

    #[test]
    fn test_schema_text_columns_are_never_numeric() {
        let data = " product ,user_id,note\n007,42,7\n12,43,8\n";
        let table = parse_csv(DatasetKind::Tracking, data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0], vec![Cell::from("007"), Cell::from("42"), Cell::Int(7)]);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let data = "influencer_id,caption\n1,\"Leg day, again\"\n";
        let table = parse_csv(DatasetKind::Posts, data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0][1], Cell::Text("Leg day, again".into()));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let data = "a,b\n1,2\n3\n";
        let err = parse_csv(DatasetKind::Tracking, data.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse { dataset: DatasetKind::Tracking, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let data: &[u8] = b"a,b\n\xff\xfe,2\n";
        let err = parse_csv(DatasetKind::Posts, data).unwrap_err();
        assert!(matches!(err, DashboardError::Parse { dataset: DatasetKind::Posts, .. }));
    }

    #[test]
    fn test_empty_stream_is_parse_error() {
        let err = parse_csv(DatasetKind::Payouts, "".as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_csv(DatasetKind::Payouts, "influencer_id,amount\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_absent_upload_is_none() {
        let loaded = load_dataset::<&[u8]>(DatasetKind::Posts, None).unwrap();
        assert!(loaded.is_none());
        assert!(load_path(DatasetKind::Posts, None).unwrap().is_none());
    }

    #[test]
    fn test_load_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "influencer_id,amount\n7,1500\n").unwrap();

        let table = load_path(DatasetKind::Payouts, Some(file.path())).unwrap().unwrap();
        assert_eq!(table.rows()[0], vec![Cell::Int(7), Cell::Int(1500)]);
    }

    #[test]
    fn test_uploads_report_missing_in_order() {
        let uploads = DatasetUploads {
            posts: Some(Table::default()),
            ..Default::default()
        };
        assert_eq!(
            uploads.missing(),
            vec![DatasetKind::Influencers, DatasetKind::Tracking, DatasetKind::Payouts]
        );
    }
}
