use rust_decimal::Decimal;
use serde::Serialize;

/// Billing terms as stored on a project, a project member or a team relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillingTerms {
    pub hourly_rate: Option<Decimal>,
    pub currency: Option<String>,
    pub non_monetary: bool,
}

impl BillingTerms {
    pub fn monetary(rate: Decimal, currency: &str) -> Self {
        Self {
            hourly_rate: Some(rate),
            currency: Some(currency.to_string()),
            non_monetary: false,
        }
    }

    pub fn non_monetary() -> Self {
        Self {
            hourly_rate: None,
            currency: None,
            non_monetary: true,
        }
    }

    /// True when these terms decide the rate (a rate or an explicit
    /// non-monetary flag); unset terms defer to the next level.
    pub fn is_decisive(&self) -> bool {
        self.non_monetary || self.hourly_rate.is_some()
    }
}

/// Outcome of rate resolution for a (project, user) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedRate {
    pub hourly_rate: Option<Decimal>,
    pub currency: Option<String>,
    pub non_monetary: bool,
}
