//! Handlers for the setup commands: client, project, member, team,
//! approver, task, invoice and tag.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::catalog::{CatalogLogic, billing_terms};
use crate::errors::{AppError, AppResult};
use crate::models::project::ProjectMember;
use crate::models::status::{InvoiceStatus, TaskStatus};
use crate::models::team::TeamAssignment;
use crate::ui::messages::{info, success};
use crate::utils::date::{parse_date, today};
use crate::utils::money::parse_optional_decimal;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match cmd {
        Commands::Client { name, email } => {
            let id = CatalogLogic::add_client(&mut pool, name, email)?;
            success(format!("Client #{id} '{}' created.", name.trim()));
        }

        Commands::Project {
            name,
            owner,
            client,
            rate,
            currency,
            non_monetary,
        } => {
            let billing = billing_terms(
                parse_optional_decimal(rate.as_ref())?,
                currency.as_deref(),
                *non_monetary,
            )?;
            let id = CatalogLogic::add_project(&mut pool, name, *client, *owner, &billing)?;
            success(format!("Project #{id} '{}' created.", name.trim()));
        }

        Commands::Member {
            project,
            user,
            rate,
            currency,
            non_monetary,
        } => {
            let member = ProjectMember {
                project_id: *project,
                user_id: *user,
                billing: billing_terms(
                    parse_optional_decimal(rate.as_ref())?,
                    currency.as_deref(),
                    *non_monetary,
                )?,
            };
            CatalogLogic::set_member(&mut pool, &member)?;
            success(format!("User {user} assigned to project #{project}."));
        }

        Commands::Team {
            leader,
            member,
            rate,
            currency,
            non_monetary,
            employee,
        } => {
            let team = TeamAssignment {
                leader_id: *leader,
                member_id: *member,
                billing: billing_terms(
                    parse_optional_decimal(rate.as_ref())?,
                    currency.as_deref(),
                    *non_monetary,
                )?,
                is_employee: *employee,
            };
            CatalogLogic::set_team(&mut pool, &team)?;
            success(format!("User {member} is now in the team of user {leader}."));
        }

        Commands::Approver { project, user } => {
            if CatalogLogic::add_approver(&mut pool, *project, *user)? {
                success(format!("User {user} can now approve time on project #{project}."));
            } else {
                info(format!("User {user} already approves project #{project}."));
            }
        }

        Commands::Task {
            name,
            project,
            done,
            reopen,
        } => {
            if let Some(id) = done {
                CatalogLogic::set_task_status(&mut pool, *id, TaskStatus::Done)?;
                success(format!("Task #{id} marked as done."));
            } else if let Some(id) = reopen {
                CatalogLogic::set_task_status(&mut pool, *id, TaskStatus::Open)?;
                success(format!("Task #{id} reopened."));
            } else {
                let (Some(name), Some(project)) = (name, project) else {
                    return Err(AppError::Validation(
                        "a new task needs a name and --project".into(),
                    ));
                };
                let id = CatalogLogic::add_task(&mut pool, *project, name)?;
                success(format!("Task #{id} created on project #{project}."));
            }
        }

        Commands::Invoice {
            id,
            status,
            client,
            project,
            number,
            date,
            total,
            currency,
        } => {
            if let (Some(id), Some(raw)) = (id, status) {
                let st = InvoiceStatus::from_db_str(&raw.trim().to_lowercase())
                    .ok_or_else(|| AppError::InvalidStatus(raw.clone()))?;
                CatalogLogic::set_invoice_status(&mut pool, *id, st)?;
                success(format!("Invoice #{id} is now {}.", st.to_db_str()));
                return Ok(());
            }

            let (Some(client), Some(number)) = (client, number) else {
                return Err(AppError::Validation(
                    "a new invoice needs --client and --number".into(),
                ));
            };
            let issue_date = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => today(),
            };
            let currency = currency.as_deref().unwrap_or(&cfg.default_currency);
            let id = CatalogLogic::add_invoice(
                &mut pool,
                *client,
                *project,
                number,
                issue_date,
                parse_optional_decimal(total.as_ref())?,
                currency,
            )?;
            success(format!("Invoice #{id} '{}' created as draft.", number.trim()));
        }

        Commands::Tag { id, name } => {
            if CatalogLogic::tag(&mut pool, *id, name)? {
                success(format!("Tag '{}' attached to time log #{id}.", name.trim()));
            } else {
                info(format!("Time log #{id} already has tag '{}'.", name.trim()));
            }
        }

        _ => {}
    }

    Ok(())
}

