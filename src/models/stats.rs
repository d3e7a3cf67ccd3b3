use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregates over an already-scoped set of time logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeLogStats {
    pub total_duration: Decimal,
    pub unpaid_hours: Decimal,
    pub unbillable_hours: Decimal,
    pub paid_hours: Decimal,
    pub unpaid_amounts_by_currency: BTreeMap<String, Decimal>,
    pub paid_amounts_by_currency: BTreeMap<String, Decimal>,
    pub weekly_average: Decimal,
    pub weeks: usize,
    pub count: usize,
}
