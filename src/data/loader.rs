use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;

use super::error::{DataError, Result};
use super::model::{SnapshotTable, TrendRecord, WeekKey, DATE_FORMAT};

const TOPIC: &str = "topic";
const DATE: &str = "date";
const DISTRIBUTION: &str = "distribution";
const WEEK: &str = "week";

// ---------------------------------------------------------------------------
// Long-format trend table
// ---------------------------------------------------------------------------

/// Load the long-format trend table.
///
/// Expected layout (column order is free, extra columns are ignored):
///
/// ```text
/// topic,date,distribution
/// Vacunación,2021-01-04,0.183
/// pemex,2021-01-04,0.071
/// ```
pub fn load_trends(path: impl AsRef<Path>) -> Result<Vec<TrendRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::file_access(path, e))?;
    let records = read_trends(file)?;
    log::info!(
        "Loaded {} trend records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Parse a long-format trend table from any reader.
pub fn read_trends<R: Read>(source: R) -> Result<Vec<TrendRecord>> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();

    let topic_idx = column_index(&headers, TOPIC)?;
    let date_idx = column_index(&headers, DATE)?;
    let dist_idx = column_index(&headers, DISTRIBUTION)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = line_of(&row);

        let topic = row.get(topic_idx).unwrap_or("").to_string();
        let date = parse_date(row.get(date_idx).unwrap_or(""), line)?;
        let distribution = parse_weight(row.get(dist_idx).unwrap_or(""), line, DISTRIBUTION)?;

        records.push(TrendRecord {
            topic,
            date,
            distribution,
        });
    }
    Ok(records)
}

/// Write records as `topic,date,distribution`.
pub fn write_trends<W: Write>(sink: W, records: &[TrendRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_trends(path: impl AsRef<Path>, records: &[TrendRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DataError::file_access(path, e))?;
    write_trends(file, records)?;
    log::info!(
        "Wrote {} trend records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Wide-format weekly table
// ---------------------------------------------------------------------------

/// Load the wide-format weekly table.
///
/// Layout: a `week` column plus one numeric column per topic.
///
/// ```text
/// week,Vacunación,pemex,economía
/// 2021-01-04,0.61,0.03,0.36
/// ```
///
/// Columns with an empty header (a dumped DataFrame index) are skipped.
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<SnapshotTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::file_access(path, e))?;
    let table = read_snapshots(file)?;
    log::info!(
        "Loaded {} weeks x {} topics from {}",
        table.len(),
        table.topics().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a wide-format weekly table from any reader.
pub fn read_snapshots<R: Read>(source: R) -> Result<SnapshotTable> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();
    let week_idx = column_index(&headers, WEEK)?;

    let topic_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != week_idx && !name.is_empty())
        .map(|(i, name)| (i, name.to_string()))
        .collect();

    let mut table = SnapshotTable::new(topic_cols.iter().map(|(_, n)| n.clone()).collect());

    for result in reader.records() {
        let row = result?;
        let line = line_of(&row);

        let week = WeekKey::parse(row.get(week_idx).unwrap_or(""));
        let values = topic_cols
            .iter()
            .map(|(idx, name)| parse_weight(row.get(*idx).unwrap_or(""), line, name))
            .collect::<Result<Vec<f64>>>()?;

        table.push_row(week, values);
    }
    Ok(table)
}

/// Write a table as `week,<topic>...`.
pub fn write_snapshots<W: Write>(sink: W, table: &SnapshotTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(std::iter::once(WEEK).chain(table.topics().iter().map(String::as_str)))?;
    for row in table.rows() {
        let mut fields = Vec::with_capacity(row.values.len() + 1);
        fields.push(row.week.to_string());
        fields.extend(row.values.iter().map(f64::to_string));
        writer.write_record(&fields)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_snapshots(path: impl AsRef<Path>, table: &SnapshotTable) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DataError::file_access(path, e))?;
    write_snapshots(file, table)?;
    log::info!("Wrote {} weeks to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_date(raw: &str, line: u64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| DataError::MalformedValue {
        line,
        column: DATE.to_string(),
        value: raw.to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

fn parse_weight(raw: &str, line: u64, column: &str) -> Result<f64> {
    let malformed = |reason: &str| DataError::MalformedValue {
        line,
        column: column.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let value: f64 = raw.parse().map_err(|_| malformed("not a number"))?;
    if !value.is_finite() {
        return Err(malformed("not a finite number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::ErrorKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_trend_rows_in_order() {
        let csv = "topic,date,distribution\n\
                   vaccine,2021-01-01,0.6\n\
                   economy,2021-01-01,0.4\n\
                   vaccine,2021-01-08,0.3\n";
        let records = read_trends(csv.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                TrendRecord::new("vaccine", day(2021, 1, 1), 0.6),
                TrendRecord::new("economy", day(2021, 1, 1), 0.4),
                TrendRecord::new("vaccine", day(2021, 1, 8), 0.3),
            ]
        );
    }

    #[test]
    fn trend_columns_may_be_reordered_and_padded() {
        let csv = "distribution,extra,topic,date\n0.25, x ,pemex, 2021-03-01\n";
        let records = read_trends(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![TrendRecord::new("pemex", day(2021, 3, 1), 0.25)]);
    }

    #[test]
    fn header_only_trend_file_is_empty() {
        let records = read_trends("topic,date,distribution\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_trend_column_is_format_error() {
        let err = read_trends("topic,week,distribution\na,2021-01-01,0.5\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "date"));
        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "topic,date,distribution\na,2021-01-01,0.5\nb,01/08/2021,0.5\n";
        match read_trends(csv.as_bytes()).unwrap_err() {
            DataError::MalformedValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "date");
                assert_eq!(value, "01/08/2021");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_distribution_is_format_error() {
        for bad in ["high", "", "NaN", "inf"] {
            let csv = format!("topic,date,distribution\na,2021-01-01,{bad}\n");
            let err = read_trends(csv.as_bytes()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DataFormat, "value {bad:?}");
        }
    }

    #[test]
    fn ragged_row_is_format_error() {
        let csv = "topic,date,distribution\na,2021-01-01\n";
        let err = read_trends(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[test]
    fn missing_file_is_access_error() {
        let err = load_trends("definitely/not/here.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
        let err = load_snapshots("definitely/not/here.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn reads_wide_table() {
        let csv = "week,vaccine,economy,pemex\n\
                   2021-01-01,0.6,0.04,0.36\n\
                   2021-01-08,0.2,0.5,0.3\n";
        let table = read_snapshots(csv.as_bytes()).unwrap();
        assert_eq!(table.topics(), ["vaccine", "economy", "pemex"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].week.as_str(), "2021-01-08");
        assert_eq!(table.rows()[1].values, vec![0.2, 0.5, 0.3]);
    }

    #[test]
    fn wide_table_skips_index_column_and_normalizes_week() {
        let csv = ",week,vaccine\n0,2021-01-01 00:00:00,1.0\n";
        let table = read_snapshots(csv.as_bytes()).unwrap();
        assert_eq!(table.topics(), ["vaccine"]);
        assert_eq!(table.rows()[0].week.as_str(), "2021-01-01");
    }

    #[test]
    fn missing_week_column_is_format_error() {
        let err = read_snapshots("date,vaccine\n2021-01-01,1.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "week"));
    }

    #[test]
    fn non_numeric_topic_cell_is_format_error() {
        let err = read_snapshots("week,vaccine\n2021-01-01,lots\n".as_bytes()).unwrap_err();
        match err {
            DataError::MalformedValue { column, line, .. } => {
                assert_eq!(column, "vaccine");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trend_writer_emits_expected_header() {
        let mut out = Vec::new();
        write_trends(&mut out, &[TrendRecord::new("pemex", day(2021, 1, 4), 0.5)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "topic,date,distribution\npemex,2021-01-04,0.5\n");
    }

    #[test]
    fn snapshot_writer_output_reloads() {
        let records = vec![
            TrendRecord::new("a", day(2021, 1, 4), 0.75),
            TrendRecord::new("b", day(2021, 1, 4), 0.25),
        ];
        let table = SnapshotTable::from_trends(&records);
        let mut out = Vec::new();
        write_snapshots(&mut out, &table).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "week,a,b\n2021-01-04,0.75,0.25\n"
        );
        assert_eq!(read_snapshots(out.as_slice()).unwrap(), table);
    }
}
