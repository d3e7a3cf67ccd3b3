//! Setup operations around the approval workflow: clients, projects,
//! assignments, approvers, tasks, tags and invoices. Every mutation leaves
//! an audit row.

use crate::core::filter::FilterParams;
use crate::core::stats::stats_for;
use crate::db::catalog::{self, NewInvoice};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::projects::{self, get_project};
use crate::db::{tags, time_logs};
use crate::errors::{AppError, AppResult};
use crate::models::project::ProjectMember;
use crate::models::rate::BillingTerms;
use crate::models::status::{InvoiceStatus, TaskStatus};
use crate::models::team::TeamAssignment;
use crate::utils::money::normalize_currency;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Build billing terms from command-line style inputs.
pub fn billing_terms(
    rate: Option<Decimal>,
    currency: Option<&str>,
    non_monetary: bool,
) -> AppResult<BillingTerms> {
    if non_monetary {
        if rate.is_some() {
            return Err(AppError::Validation(
                "a non-monetary assignment cannot carry a rate".into(),
            ));
        }
        return Ok(BillingTerms::non_monetary());
    }
    if let Some(r) = rate
        && r < Decimal::ZERO
    {
        return Err(AppError::Validation(format!("rate must not be negative, got {r}")));
    }
    Ok(BillingTerms {
        hourly_rate: rate,
        currency: currency.map(normalize_currency).transpose()?,
        non_monetary: false,
    })
}

pub struct CatalogLogic;

impl CatalogLogic {
    pub fn add_client(pool: &mut DbPool, name: &str, email: &str) -> AppResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("client name is required".into()));
        }
        let tx = pool.conn.transaction()?;
        let id = catalog::insert_client(&tx, name, email.trim())?;
        ttlog(&tx, "add", &format!("client #{id}"), name)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn add_project(
        pool: &mut DbPool,
        name: &str,
        client_id: Option<i64>,
        owner_id: i64,
        billing: &BillingTerms,
    ) -> AppResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("project name is required".into()));
        }
        let tx = pool.conn.transaction()?;
        let id = projects::insert_project(&tx, name, client_id, owner_id, billing)?;
        ttlog(
            &tx,
            "add",
            &format!("project #{id}"),
            &format!("{name} owned by user {owner_id}"),
        )?;
        tx.commit()?;
        Ok(id)
    }

    pub fn set_member(pool: &mut DbPool, member: &ProjectMember) -> AppResult<()> {
        let tx = pool.conn.transaction()?;
        get_project(&tx, member.project_id)?;
        projects::upsert_member(&tx, member)?;
        ttlog(
            &tx,
            "member",
            &format!("project #{}", member.project_id),
            &format!("user {} assigned", member.user_id),
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn set_team(pool: &mut DbPool, team: &TeamAssignment) -> AppResult<()> {
        if team.leader_id == team.member_id {
            return Err(AppError::Validation("a user cannot lead themselves".into()));
        }
        let tx = pool.conn.transaction()?;
        projects::upsert_team_assignment(&tx, team)?;
        ttlog(
            &tx,
            "team",
            &format!("leader {}", team.leader_id),
            &format!("member {} assigned", team.member_id),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Designate `user_id` as approver of `project_id`. Returns false when
    /// the user already was one.
    pub fn add_approver(pool: &mut DbPool, project_id: i64, user_id: i64) -> AppResult<bool> {
        let tx = pool.conn.transaction()?;
        get_project(&tx, project_id)?;
        let added = projects::add_approver(&tx, project_id, user_id)?;
        if added {
            ttlog(
                &tx,
                "approver",
                &format!("project #{project_id}"),
                &format!("user {user_id} designated"),
            )?;
        }
        tx.commit()?;
        Ok(added)
    }

    pub fn add_task(pool: &mut DbPool, project_id: i64, name: &str) -> AppResult<i64> {
        let tx = pool.conn.transaction()?;
        get_project(&tx, project_id)?;
        let id = catalog::insert_task(&tx, project_id, name.trim())?;
        ttlog(&tx, "add", &format!("task #{id}"), name)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn set_task_status(pool: &mut DbPool, id: i64, status: TaskStatus) -> AppResult<()> {
        let tx = pool.conn.transaction()?;
        catalog::set_task_status(&tx, id, status)?;
        ttlog(&tx, "edit", &format!("task #{id}"), status.to_db_str())?;
        tx.commit()?;
        Ok(())
    }

    /// Attach tag `name` to a time log, creating the tag on first use.
    pub fn tag(pool: &mut DbPool, time_log_id: i64, name: &str) -> AppResult<bool> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("tag name is required".into()));
        }
        let tx = pool.conn.transaction()?;
        time_logs::get(&tx, time_log_id)?;
        let tag_id = tags::ensure_tag(&tx, name)?;
        let attached = tags::attach(&tx, time_log_id, tag_id)?;
        if attached {
            ttlog(&tx, "tag", &format!("time_log #{time_log_id}"), name.trim())?;
        }
        tx.commit()?;
        Ok(attached)
    }

    /// Sum of paid amounts in `currency` over the approved logs of a project.
    pub fn paid_total(pool: &DbPool, project_id: i64, currency: &str) -> AppResult<Decimal> {
        let params = FilterParams::new()
            .with("project_id", &project_id.to_string())
            .with("is_paid", "true");
        let stats = stats_for(&pool.conn, &params)?;
        Ok(stats
            .paid_amounts_by_currency
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    /// Create a draft invoice. Without an explicit total the paid amount of
    /// the project's approved logs is used.
    pub fn add_invoice(
        pool: &mut DbPool,
        client_id: i64,
        project_id: Option<i64>,
        number: &str,
        issue_date: NaiveDate,
        total: Option<Decimal>,
        currency: &str,
    ) -> AppResult<i64> {
        let currency = normalize_currency(currency)?;
        let total = match (total, project_id) {
            (Some(t), _) => t,
            (None, Some(pid)) => Self::paid_total(pool, pid, &currency)?,
            (None, None) => {
                return Err(AppError::Validation(
                    "--total is required when no project is given".into(),
                ));
            }
        };

        let tx = pool.conn.transaction()?;
        let id = catalog::insert_invoice(
            &tx,
            &NewInvoice {
                client_id,
                project_id,
                number: number.trim(),
                issue_date,
                total,
                currency: &currency,
            },
        )?;
        ttlog(
            &tx,
            "add",
            &format!("invoice #{id}"),
            &format!("{number} {total} {currency}"),
        )?;
        tx.commit()?;
        Ok(id)
    }

    pub fn set_invoice_status(pool: &mut DbPool, id: i64, status: InvoiceStatus) -> AppResult<()> {
        let tx = pool.conn.transaction()?;
        catalog::set_invoice_status(&tx, id, status)?;
        ttlog(&tx, "edit", &format!("invoice #{id}"), status.to_db_str())?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn non_monetary_rejects_a_rate() {
        assert!(billing_terms(Some(dec!(10)), None, true).is_err());
        assert!(billing_terms(None, None, true).unwrap().non_monetary);
    }

    #[test]
    fn currency_is_normalized() {
        let t = billing_terms(Some(dec!(45)), Some("eur"), false).unwrap();
        assert_eq!(t.currency.as_deref(), Some("EUR"));
        assert_eq!(t.hourly_rate, Some(dec!(45)));
    }

    #[test]
    fn negative_rates_are_refused() {
        assert!(billing_terms(Some(dec!(-1)), None, false).is_err());
    }
}
