use super::status::InvoiceStatus;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub number: String,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub total: Decimal,
    pub currency: String,
    pub created_at: NaiveDateTime,
}
