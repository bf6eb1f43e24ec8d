//! CSV interchange for health records.
//!
//! The wire format is fixed: header `Date,Weight,Height,Systolic,Diastolic,Steps`,
//! comma-delimited, one record per line, dates as `YYYY-MM-DD`. Cells are
//! plain numbers or dates, so no quoting or escaping is performed.

use crate::error::{FormatError, FormatErrorKind};
use crate::{BloodPressure, Error, HealthRecord, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use std::fmt;
use std::str::FromStr;

/// Header row written on export
pub const CSV_HEADER: &str = "Date,Weight,Height,Systolic,Diastolic,Steps";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns of the fixed schema
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Date,
    Weight,
    Height,
    Systolic,
    Diastolic,
    Steps,
}

impl Column {
    const ALL: [Column; 6] = [
        Column::Date,
        Column::Weight,
        Column::Height,
        Column::Systolic,
        Column::Diastolic,
        Column::Steps,
    ];

    fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Weight => "Weight",
            Column::Height => "Height",
            Column::Systolic => "Systolic",
            Column::Diastolic => "Diastolic",
            Column::Steps => "Steps",
        }
    }
}

/// A successfully coerced, non-empty cell
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cell {
    Date(NaiveDate),
    Decimal(f64),
    Pressure(u16),
    Count(u32),
}

// ============================================================================
// Export
// ============================================================================

/// Output format of an exported file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(crate::Error::Other(format!("Unknown export format: {}", other))),
        }
    }
}

/// `health-info-YYYYMMDD.<ext>` for an export made on `date`
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("health-info-{}.{}", date.format("%Y%m%d"), format.extension())
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row_cells(record: &HealthRecord) -> [String; 6] {
    let bp = record.blood_pressure;
    [
        optional_cell(record.date.map(|d| d.format(DATE_FORMAT))),
        optional_cell(record.weight),
        optional_cell(record.height),
        optional_cell(bp.map(|bp| bp.systolic)),
        optional_cell(bp.map(|bp| bp.diastolic)),
        optional_cell(record.steps),
    ]
}

/// Write the header and one line per record through the csv writer.
/// Every line, the last included, ends in `\n`.
fn write_csv(records: &[HealthRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(Column::ALL.iter().map(|c| c.header()))?;
    for record in records {
        writer.write_record(&row_cells(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output is not UTF-8: {}", e)))
}

/// Render records as CSV text, failing only if the csv writer does.
///
/// Lines are joined by `\n` with no line break after the last record. An
/// empty collection renders as the header followed by one line break.
pub fn try_export_csv(records: &[HealthRecord]) -> Result<String> {
    let mut out = write_csv(records)?;
    if !records.is_empty() {
        out.pop();
    }
    tracing::debug!("Exported {} records to CSV", records.len());
    Ok(out)
}

/// Render records as CSV text. See [`try_export_csv`] for the layout.
///
/// The writer targets an in-memory buffer of plain dates and numbers, so it
/// has no failure path in practice. Should it fail anyway, the error is
/// logged and the empty-collection layout is returned.
pub fn export_csv(records: &[HealthRecord]) -> String {
    try_export_csv(records).unwrap_or_else(|e| {
        tracing::error!("CSV export of {} records failed: {}", records.len(), e);
        format!("{}\n", CSV_HEADER)
    })
}

/// Render records as a pretty-printed JSON array
pub fn export_json(records: &[HealthRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render records in the requested format
pub fn export(records: &[HealthRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => try_export_csv(records),
        ExportFormat::Json => export_json(records),
    }
}

// ============================================================================
// Import
// ============================================================================

/// Coerce one trimmed cell of `column`. Empty cells yield `None`.
fn convert_cell(column: Column, raw: &str) -> std::result::Result<Option<Cell>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let bad_number = |expected: &str| {
        FormatError::new(
            FormatErrorKind::BadNumber,
            format!("{} value '{}' is not {}", column.header(), raw, expected),
        )
    };

    let cell = match column {
        Column::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Cell::Date)
            .map_err(|_| {
                FormatError::new(FormatErrorKind::BadDate, format!("invalid date '{}'", raw))
            })?,
        Column::Weight | Column::Height => {
            let value: f64 = raw.parse().map_err(|_| bad_number("a number"))?;
            if !value.is_finite() || value <= 0.0 {
                return Err(bad_number("a positive number"));
            }
            Cell::Decimal(value)
        }
        Column::Systolic | Column::Diastolic => raw
            .parse()
            .map(Cell::Pressure)
            .map_err(|_| bad_number("a whole mmHg value"))?,
        Column::Steps => raw
            .parse()
            .map(Cell::Count)
            .map_err(|_| bad_number("a non-negative whole number"))?,
    };
    Ok(Some(cell))
}

/// Header position of every schema column, or the names that are missing
fn locate_columns(headers: &StringRecord) -> std::result::Result<[usize; 6], FormatError> {
    let mut positions = [0usize; 6];
    let mut missing = Vec::new();

    for (slot, column) in positions.iter_mut().zip(Column::ALL) {
        match headers.iter().position(|h| h == column.header()) {
            Some(index) => *slot = index,
            None => missing.push(column.header()),
        }
    }

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(FormatError::new(
            FormatErrorKind::BadHeader,
            format!("missing required columns: {}", missing.join(", ")),
        ))
    }
}

fn parse_row(
    row: &StringRecord,
    positions: &[usize; 6],
) -> std::result::Result<HealthRecord, FormatError> {
    let mut record = HealthRecord::default();
    let mut systolic = None;
    let mut diastolic = None;

    for (column, index) in Column::ALL.into_iter().zip(positions) {
        let raw = row.get(*index).unwrap_or("");
        match convert_cell(column, raw)? {
            None => {}
            Some(Cell::Date(date)) => record.date = Some(date),
            Some(Cell::Decimal(value)) if column == Column::Weight => record.weight = Some(value),
            Some(Cell::Decimal(value)) => record.height = Some(value),
            Some(Cell::Pressure(value)) if column == Column::Systolic => systolic = Some(value),
            Some(Cell::Pressure(value)) => diastolic = Some(value),
            Some(Cell::Count(value)) => record.steps = Some(value),
        }
    }

    record.blood_pressure = match (systolic, diastolic) {
        (Some(s), Some(d)) => Some(BloodPressure::new(s, d)),
        (None, None) => None,
        _ => {
            return Err(FormatError::new(
                FormatErrorKind::BadRow,
                "Systolic and Diastolic must both be present or both be empty",
            ))
        }
    };

    Ok(record)
}

/// Parse CSV text into records, in row order.
///
/// The text must hold a header line terminated by a line break; data rows
/// are optional, so the output of exporting an empty collection imports as
/// an empty collection. Columns may be reordered or extra, but all six
/// schema headers must be present. The first defect aborts the whole import.
pub fn import_csv(text: &str) -> std::result::Result<Vec<HealthRecord>, FormatError> {
    // Leading blank lines are skipped but still counted, so reported line
    // numbers stay 1-based in `text`.
    let mut skipped = 0u64;
    let mut body = text;
    while let Some((line, rest)) = body.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        skipped += 1;
        body = rest;
    }

    let has_header_line = body
        .split_once('\n')
        .map_or(false, |(header, _)| !header.trim().is_empty());
    if !has_header_line {
        return Err(FormatError::new(
            FormatErrorKind::Empty,
            "CSV text has no header and data section",
        ));
    }
    let header_line = skipped + 1;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| {
            FormatError::new(FormatErrorKind::BadHeader, e.to_string()).at_line(header_line)
        })?
        .clone();
    let positions = locate_columns(&headers).map_err(|e| e.at_line(header_line))?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row =
            result.map_err(|e| FormatError::new(FormatErrorKind::BadRow, e.to_string()))?;
        let line = row.position().map_or(0, |p| p.line()) + skipped;

        // Blank or whitespace-only line. A row of empty cells is still a record.
        if row.len() == 1 && row.get(0) == Some("") {
            continue;
        }

        if row.len() != headers.len() {
            return Err(FormatError::new(
                FormatErrorKind::BadRow,
                format!("expected {} columns, found {}", headers.len(), row.len()),
            )
            .at_line(line));
        }

        let record = parse_row(&row, &positions).map_err(|e| e.at_line(line))?;
        records.push(record);
    }

    tracing::debug!("Imported {} records from CSV", records.len());
    Ok(records)
}
