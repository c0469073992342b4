//! Delimited-file source for raw records.
//!
//! The first column is the date index. Price and volume columns are found
//! by header name, case-insensitively; other columns are ignored.

use crate::loader::load_series;
use crossover_core::{Error, RawRecord, Result, Series};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = ColumnMap::default();
        // Column 0 is the date index whatever its name.
        for (idx, name) in headers.iter().enumerate().skip(1) {
            let slot = match name.trim().to_ascii_lowercase().as_str() {
                "open" => &mut map.open,
                "high" => &mut map.high,
                "low" => &mut map.low,
                "close" => &mut map.close,
                "volume" => &mut map.volume,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn map_csv_error(err: csv::Error) -> Error {
    let msg = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        _ => Error::malformed_input(msg),
    }
}

/// Read raw records from any reader. The first row must be a header.
pub fn read_raw_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(map_csv_error)?.clone();
    let columns = ColumnMap::from_headers(&headers);
    if columns.close.is_none() || columns.volume.is_none() {
        warn!(headers = ?headers, "Close or Volume column not found");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(map_csv_error)?;
        records.push(RawRecord {
            date: row.get(0).unwrap_or_default().trim().to_string(),
            open: field(&row, columns.open),
            high: field(&row, columns.high),
            low: field(&row, columns.low),
            close: field(&row, columns.close),
            volume: field(&row, columns.volume),
        });
    }

    debug!(rows = records.len(), "Read raw records");
    Ok(records)
}

/// Read raw records from a file.
pub fn read_raw_records_from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<RawRecord>> {
    let file = File::open(path.as_ref())?;
    read_raw_records(BufReader::new(file), delimiter)
}

/// Read a file and normalize it into a series.
pub fn load_series_from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Series> {
    let raw = read_raw_records_from_path(path, delimiter)?;
    load_series(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,11,12,10,11.5,11.5,900
2024-01-02,10,11,9,10.5,10.5,0
2024-01-01,9,10,8,9.5,9.5,1000
";

    #[test]
    fn test_reads_columns_by_name() {
        let records = read_raw_records(SAMPLE.as_bytes(), b',').unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, "2024-01-03");
        assert_eq!(records[0].open.as_deref(), Some("11"));
        // "Adj Close" must not shadow "Close"
        assert_eq!(records[0].close.as_deref(), Some("11.5"));
        assert_eq!(records[0].volume.as_deref(), Some("900"));
    }

    #[test]
    fn test_headers_case_insensitive() {
        let data = "date;close;VOLUME\n2024-01-01;10;5\n";
        let records = read_raw_records(data.as_bytes(), b';').unwrap();
        assert_eq!(records[0].close.as_deref(), Some("10"));
        assert_eq!(records[0].volume.as_deref(), Some("5"));
        assert_eq!(records[0].open, None);
    }

    #[test]
    fn test_missing_close_column_fails_on_load() {
        let data = "Date,Open,Volume\n2024-01-01,10,5\n";
        let records = read_raw_records(data.as_bytes(), b',').unwrap();
        let err = load_series(records).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_short_row_leaves_fields_missing() {
        let data = "Date,Close,Volume\n2024-01-01,10\n";
        let records = read_raw_records(data.as_bytes(), b',').unwrap();
        assert_eq!(records[0].volume, None);
    }

    #[test]
    fn test_header_only() {
        let records = read_raw_records("Date,Close,Volume\n".as_bytes(), b',').unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let series = load_series_from_path(file.path(), b',').unwrap();

        // Zero-volume day dropped, rest sorted
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![9.5, 11.5]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_series_from_path("/nonexistent/prices.csv", b',').unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
