use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Timelike};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, SalesTable, Transaction};
use crate::config::SourceConfig;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the transaction table described by `source`.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` – worksheet `sheet_name`, header after `skip_rows`
///   rows, only the `columns` letter range (the sales export layout)
/// * `.csv`            – header on the first line
/// * `.json`           – `[{ "City": "Yangon", "Total": 548.97, ... }, ...]`
/// * `.parquet`        – one column per field
///
/// Every format reads at most `max_rows` data rows.
pub fn load_source(source: &SourceConfig) -> Result<SalesTable, LoadError> {
    let path = source.path.as_path();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" => read_xlsx(path, source)?,
        "csv" => read_csv(path, source.max_rows)?,
        "json" => read_json(path, source.max_rows)?,
        "parquet" | "pq" => read_parquet(path, source.max_rows)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    build_table(&grid)
}

// ---------------------------------------------------------------------------
// Raw grid: the format-independent intermediate
// ---------------------------------------------------------------------------

/// Header names plus decoded rows, as produced by each format reader.
#[derive(Debug, Default)]
struct RawGrid {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

#[derive(Debug)]
struct RawRow {
    /// 1-based line / row number in the source, for error messages.
    line: usize,
    cells: Vec<CellValue>,
}

impl RawRow {
    fn cell(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// XLSX reader
// ---------------------------------------------------------------------------

/// Read the configured window of a worksheet.
///
/// Positions are absolute sheet coordinates, so the window is independent of
/// where the used range of the sheet happens to start.
fn read_xlsx(path: &Path, source: &SourceConfig) -> Result<RawGrid, LoadError> {
    let (first_col, last_col) = parse_column_range(&source.columns)?;

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    if !workbook
        .sheet_names()
        .iter()
        .any(|name| name == &source.sheet_name)
    {
        return Err(LoadError::SheetNotFound(source.sheet_name.clone()));
    }
    let range = workbook.worksheet_range(&source.sheet_name)?;

    let header_row = source.skip_rows as u32;
    let headers = (first_col..=last_col)
        .map(|col| sheet_cell(&range, header_row, col).to_string().trim().to_string())
        .collect();

    let last_row = range.end().map(|(row, _)| row).unwrap_or(0);
    let mut rows = Vec::new();
    for row in header_row.saturating_add(1)..=last_row {
        if rows.len() >= source.max_rows {
            break;
        }
        let cells: Vec<CellValue> = (first_col..=last_col)
            .map(|col| sheet_cell(&range, row, col))
            .collect();
        // Blank separator rows are skipped, not treated as the end of data.
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        rows.push(RawRow {
            line: row as usize + 1,
            cells,
        });
    }

    Ok(RawGrid { headers, rows })
}

fn sheet_cell(range: &Range<Data>, row: u32, col: u32) -> CellValue {
    range
        .get_value((row, col))
        .map(data_to_cell)
        .unwrap_or(CellValue::Empty)
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // Spreadsheet serial: whole days since 1899-12-30 plus a day fraction.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
    }
}

/// Parse a column-letter range like `B:R` into 0-based inclusive bounds.
pub fn parse_column_range(spec: &str) -> Result<(u32, u32), LoadError> {
    let err = || LoadError::ColumnRange(spec.to_string());
    let (start, end) = spec.split_once(':').ok_or_else(err)?;
    let start = column_index(start.trim()).ok_or_else(err)?;
    let end = column_index(end.trim()).ok_or_else(err)?;
    if start > end {
        return Err(err());
    }
    Ok((start, end))
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, max_rows: usize) -> Result<RawGrid, LoadError> {
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().take(max_rows).enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_no + 2);
        rows.push(RawRow {
            line,
            cells: record.iter().map(guess_cell).collect(),
        });
    }

    Ok(RawGrid { headers, rows })
}

fn guess_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(v) = s.parse::<f64>() {
        return CellValue::Number(v);
    }
    match parse_time(s) {
        Some(t) => CellValue::Time(t),
        None => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// Datetime columns in that layout arrive as epoch milliseconds.
///
/// ```json
/// [
///   { "Branch": "A", "City": "Yangon", "Total": 548.9715, "Time": "13:08", ... },
///   ...
/// ]
/// ```
fn read_json(path: &Path, max_rows: usize) -> Result<RawGrid, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonLayout("expected a top-level array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    for rec in records.iter().take(max_rows) {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let mut rows = Vec::new();
    for (i, rec) in records.iter().take(max_rows).enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonLayout(format!("record {} is not an object", i + 1)))?;
        let cells = headers
            .iter()
            .map(|key| obj.get(key).map(json_to_cell).unwrap_or(CellValue::Empty))
            .collect();
        rows.push(RawRow { line: i + 1, cells });
    }

    Ok(RawGrid { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Empty,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

fn read_parquet(path: &Path, max_rows: usize) -> Result<RawGrid, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.with_limit(max_rows).build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch
            .columns()
            .iter()
            .map(column_cells)
            .collect::<Result<Vec<_>, _>>()?;

        for row in 0..batch.num_rows() {
            let cells = columns.iter().map(|col| col[row].clone()).collect();
            rows.push(RawRow {
                line: rows.len() + 1,
                cells,
            });
        }
    }

    Ok(RawGrid { headers, rows })
}

/// Decode a whole Arrow column. Numbers become `Number`, dates `Date`, and
/// anything else goes through Arrow's string cast.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>, LoadError> {
    let cells = match col.data_type() {
        DataType::Date32 => {
            let arr = col.as_primitive::<Date32Type>();
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        CellValue::Empty
                    } else {
                        arr.value_as_date(i).map_or(CellValue::Empty, CellValue::Date)
                    }
                })
                .collect()
        }
        dt if dt.is_numeric() => {
            let casted = cast(col, &DataType::Float64)?;
            casted
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(CellValue::Empty, CellValue::Number))
                .collect()
        }
        _ => {
            let casted = cast(col, &DataType::Utf8)?;
            casted
                .as_string::<i32>()
                .iter()
                .map(|v| v.map_or(CellValue::Empty, |s| CellValue::Text(s.to_string())))
                .collect()
        }
    };
    Ok(cells)
}

// ---------------------------------------------------------------------------
// Grid → SalesTable
// ---------------------------------------------------------------------------

/// Positions of the consumed columns inside a [`RawGrid`].
struct ColumnIndex {
    invoice_id: Option<usize>,
    branch: usize,
    city: usize,
    customer_type: usize,
    gender: usize,
    product_line: usize,
    unit_price: usize,
    quantity: usize,
    tax: usize,
    total: usize,
    date: usize,
    time: usize,
    payment: usize,
    cogs: usize,
    gross_margin_pct: usize,
    gross_income: usize,
    rating: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let positions: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        let find = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            invoice_id: positions.get("Invoice ID").copied(),
            branch: find("Branch")?,
            city: find("City")?,
            customer_type: find("Customer_type")?,
            gender: find("Gender")?,
            product_line: find("Product line")?,
            unit_price: find("Unit price")?,
            quantity: find("Quantity")?,
            tax: find("Tax 5%")?,
            total: find("Total")?,
            date: find("Date")?,
            time: find("Time")?,
            payment: find("Payment")?,
            cogs: find("cogs")?,
            gross_margin_pct: find("gross margin percentage")?,
            gross_income: find("gross income")?,
            rating: find("Rating")?,
        })
    }

    fn transaction(&self, row: &RawRow) -> Result<Transaction, LoadError> {
        let time = time_field(row, self.time, "Time")?;
        Ok(Transaction {
            invoice_id: match self.invoice_id {
                Some(idx) => row.cell(idx).to_string().trim().to_string(),
                None => String::new(),
            },
            branch: text_field(row, self.branch, "Branch")?,
            city: text_field(row, self.city, "City")?,
            customer_type: text_field(row, self.customer_type, "Customer_type")?,
            gender: text_field(row, self.gender, "Gender")?,
            product_line: text_field(row, self.product_line, "Product line")?,
            unit_price: number_field(row, self.unit_price, "Unit price")?,
            quantity: quantity_field(row, self.quantity, "Quantity")?,
            tax: number_field(row, self.tax, "Tax 5%")?,
            total: number_field(row, self.total, "Total")?,
            date: date_field(row, self.date, "Date")?,
            time,
            payment: text_field(row, self.payment, "Payment")?,
            cogs: number_field(row, self.cogs, "cogs")?,
            gross_margin_pct: number_field(row, self.gross_margin_pct, "gross margin percentage")?,
            gross_income: number_field(row, self.gross_income, "gross income")?,
            rating: number_field(row, self.rating, "Rating")?,
            hour: time.hour() as u8,
        })
    }
}

fn build_table(grid: &RawGrid) -> Result<SalesTable, LoadError> {
    let columns = ColumnIndex::resolve(&grid.headers)?;
    if grid.rows.is_empty() {
        return Err(LoadError::Empty);
    }
    let rows = grid
        .rows
        .iter()
        .map(|row| columns.transaction(row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SalesTable::from_rows(rows))
}

// -- Field extractors --

fn cell_error(row: &RawRow, column: &str, message: impl Into<String>) -> LoadError {
    LoadError::Cell {
        line: row.line,
        column: column.to_string(),
        message: message.into(),
    }
}

fn text_field(row: &RawRow, idx: usize, column: &str) -> Result<String, LoadError> {
    let cell = row.cell(idx);
    if cell.is_empty() {
        return Err(cell_error(row, column, "missing value"));
    }
    Ok(cell.to_string().trim().to_string())
}

fn number_field(row: &RawRow, idx: usize, column: &str) -> Result<f64, LoadError> {
    match row.cell(idx) {
        CellValue::Number(v) if v.is_finite() => Ok(*v),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| cell_error(row, column, format!("'{s}' is not a number"))),
        CellValue::Empty => Err(cell_error(row, column, "missing value")),
        other => Err(cell_error(row, column, format!("'{other}' is not a number"))),
    }
}

fn quantity_field(row: &RawRow, idx: usize, column: &str) -> Result<u32, LoadError> {
    let value = number_field(row, idx, column)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(cell_error(row, column, format!("{value} is not a whole quantity")));
    }
    Ok(value as u32)
}

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

fn time_field(row: &RawRow, idx: usize, column: &str) -> Result<NaiveTime, LoadError> {
    match row.cell(idx) {
        CellValue::Time(t) => Ok(*t),
        CellValue::Number(v) => time_from_serial(*v)
            .ok_or_else(|| cell_error(row, column, format!("{v} is not a time of day"))),
        CellValue::Text(s) => parse_time(s)
            .ok_or_else(|| cell_error(row, column, format!("'{s}' is not a time (HH:MM:SS)"))),
        CellValue::Empty => Err(cell_error(row, column, "missing value")),
        CellValue::Date(d) => Err(cell_error(row, column, format!("{d} is a date, not a time"))),
    }
}

fn date_field(row: &RawRow, idx: usize, column: &str) -> Result<NaiveDate, LoadError> {
    match row.cell(idx) {
        CellValue::Date(d) => Ok(*d),
        CellValue::Number(v) => date_from_number(*v)
            .ok_or_else(|| cell_error(row, column, format!("{v} is not a date serial"))),
        CellValue::Text(s) => parse_date(s)
            .ok_or_else(|| cell_error(row, column, format!("'{s}' is not a date"))),
        CellValue::Empty => Err(cell_error(row, column, "missing value")),
        CellValue::Time(t) => Err(cell_error(row, column, format!("{t} is a time, not a date"))),
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // ISO timestamps ("2019-01-05T00:00:00") keep only the date part.
    let s = s.split('T').next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Time of day from a spreadsheet serial (the fractional part of a day).
fn time_from_serial(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let secs = (serial.fract() * 86_400.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

/// Largest spreadsheet serial, 9999-12-31.
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Spreadsheet serial, or epoch milliseconds for values past the serial range.
fn date_from_number(value: f64) -> Option<NaiveDate> {
    if value > MAX_DATE_SERIAL {
        if value.fract() != 0.0 || value > i64::MAX as f64 {
            return None;
        }
        return DateTime::from_timestamp_millis(value as i64).map(|dt| dt.date_naive());
    }
    date_from_serial(value)
}

/// Date from a spreadsheet serial (whole days since 1899-12-30).
fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
