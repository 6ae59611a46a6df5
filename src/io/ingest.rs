//! CSV ingest for the historical automobile sales dataset.
//!
//! This module turns raw CSV bytes into a `SalesTable`:
//! - **Strict schema**: all required columns must be present (exit code 3)
//! - **Strict rows**: a missing or unparsable required value aborts the load,
//!   naming the line and column
//! - extra columns are ignored

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{SalesRecord, SalesTable};
use crate::error::AppError;

pub const COL_YEAR: &str = "Year";
pub const COL_MONTH: &str = "Month";
pub const COL_SALES: &str = "Automobile_Sales";
pub const COL_VEHICLE_TYPE: &str = "Vehicle_Type";
pub const COL_ADVERTISING: &str = "Advertising_Expenditure";
pub const COL_UNEMPLOYMENT: &str = "unemployment_rate";
pub const COL_RECESSION: &str = "Recession";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_YEAR,
    COL_MONTH,
    COL_SALES,
    COL_VEHICLE_TYPE,
    COL_ADVERTISING,
    COL_UNEMPLOYMENT,
    COL_RECESSION,
];

/// Parse CSV bytes into the sales table.
pub fn parse_sales_bytes(bytes: &[u8]) -> Result<SalesTable, AppError> {
    parse_sales_csv(bytes)
}

/// Parse CSV from any reader into the sales table.
pub fn parse_sales_csv<R: Read>(input: R) -> Result<SalesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::data(format!("line {line}: CSV parse error: {e}")))?;
        let row = parse_row(&record, &header_map).map_err(|e| AppError::data(format!("line {line}: {e}")))?;
        records.push(row);
    }

    if records.is_empty() {
        return Err(AppError::data("Dataset contains no rows."));
    }

    debug!(rows = records.len(), "parsed sales csv");
    Ok(SalesTable::new(records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(&c.to_ascii_lowercase()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::data(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SalesRecord, String> {
    Ok(SalesRecord {
        year: parse_year(get_required(record, header_map, COL_YEAR)?)?,
        month: get_required(record, header_map, COL_MONTH)?.to_string(),
        automobile_sales: parse_number(get_required(record, header_map, COL_SALES)?, COL_SALES)?,
        vehicle_type: get_required(record, header_map, COL_VEHICLE_TYPE)?.to_string(),
        advertising_expenditure: parse_number(
            get_required(record, header_map, COL_ADVERTISING)?,
            COL_ADVERTISING,
        )?,
        unemployment_rate: parse_number(
            get_required(record, header_map, COL_UNEMPLOYMENT)?,
            COL_UNEMPLOYMENT,
        )?,
        recession: parse_flag(get_required(record, header_map, COL_RECESSION)?)?,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(&name.to_ascii_lowercase())
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_year(s: &str) -> Result<i32, String> {
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    // Some exports write integer columns as floats ("1980.0").
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Ok(v as i32),
        _ => Err(format!("Invalid `{COL_YEAR}` value '{s}'")),
    }
}

fn parse_number(s: &str, column: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{column}` value '{s}'")),
    }
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(format!("Invalid `{COL_RECESSION}` value '{s}' (expected 0 or 1)")),
    }
}
