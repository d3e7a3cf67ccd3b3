//! Column conversion helpers shared by the row mappers.
//!
//! Decimals are stored as TEXT to keep exact values; timestamps as TEXT in
//! `utils::time::DATETIME_FMT`.

use crate::errors::AppError;
use crate::utils::time::parse_db_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use std::str::FromStr;

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

pub fn get_decimal(row: &Row, col: &str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(col)?;
    Decimal::from_str(&raw).map_err(|_| conversion_error(AppError::InvalidAmount(raw)))
}

pub fn get_opt_decimal(row: &Row, col: &str) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| {
        Decimal::from_str(&s).map_err(|_| conversion_error(AppError::InvalidAmount(s)))
    })
    .transpose()
}

pub fn get_datetime(row: &Row, col: &str) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(col)?;
    parse_db_datetime(&raw).ok_or_else(|| conversion_error(AppError::InvalidTime(raw)))
}

pub fn get_opt_datetime(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| parse_db_datetime(&s).ok_or_else(|| conversion_error(AppError::InvalidTime(s))))
        .transpose()
}

pub fn get_date(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(raw)))
}

pub fn get_bool(row: &Row, col: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(col)? != 0)
}

pub fn decimal_to_db(d: Option<Decimal>) -> Option<String> {
    d.map(|v| v.to_string())
}
