use crate::models::rate::{BillingTerms, ResolvedRate};
use crate::models::time_log::TimeLog;
use rust_decimal::Decimal;

/// Pick the first decisive level. A non-monetary level yields no rate; a
/// rate without currency falls back to `default_currency`.
pub fn resolve<'a, I>(levels: I, default_currency: &str) -> ResolvedRate
where
    I: IntoIterator<Item = Option<&'a BillingTerms>>,
{
    for terms in levels.into_iter().flatten() {
        if !terms.is_decisive() {
            continue;
        }
        if terms.non_monetary {
            return ResolvedRate {
                hourly_rate: None,
                currency: None,
                non_monetary: true,
            };
        }
        return ResolvedRate {
            hourly_rate: terms.hourly_rate,
            currency: Some(
                terms
                    .currency
                    .clone()
                    .unwrap_or_else(|| default_currency.to_string()),
            ),
            non_monetary: false,
        };
    }
    ResolvedRate::default()
}

/// Rate used to price `log`: the resolved one, else the rate stored on the
/// log itself (manual entries). Non-monetary never prices.
pub fn effective_rate(
    resolved: &ResolvedRate,
    log: &TimeLog,
    default_currency: &str,
) -> Option<(Decimal, String)> {
    if resolved.non_monetary {
        return None;
    }
    if let Some(rate) = resolved.hourly_rate {
        let cur = resolved
            .currency
            .clone()
            .unwrap_or_else(|| default_currency.to_string());
        return Some((rate, cur));
    }
    log.hourly_rate.map(|rate| {
        (
            rate,
            log.currency
                .clone()
                .unwrap_or_else(|| default_currency.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn member_override_beats_project_default() {
        let member = BillingTerms::monetary(dec!(80), "EUR");
        let project = BillingTerms::monetary(dec!(50), "USD");
        let r = resolve([Some(&member), None, Some(&project)], "USD");
        assert_eq!(r.hourly_rate, Some(dec!(80)));
        assert_eq!(r.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn unset_levels_defer_to_the_next() {
        let empty = BillingTerms::default();
        let team = BillingTerms {
            hourly_rate: Some(dec!(40)),
            currency: None,
            non_monetary: false,
        };
        let r = resolve([Some(&empty), Some(&team), None], "GBP");
        assert_eq!(r.hourly_rate, Some(dec!(40)));
        assert_eq!(r.currency.as_deref(), Some("GBP"));
    }

    #[test]
    fn non_monetary_assignment_yields_no_rate() {
        let member = BillingTerms::non_monetary();
        let project = BillingTerms::monetary(dec!(50), "USD");
        let r = resolve([Some(&member), None, Some(&project)], "USD");
        assert!(r.non_monetary);
        assert_eq!(r.hourly_rate, None);
    }

    #[test]
    fn nothing_set_resolves_to_empty() {
        let r = resolve([None, None, Some(&BillingTerms::default())], "USD");
        assert_eq!(r, ResolvedRate::default());
    }
}
