//! Filtered listings for every resource, rendered as tables or JSON.

use crate::config::Config;
use crate::core::filter::{FilterParams, Resource};
use crate::db::catalog::{list_with, map_client, map_invoice, map_task};
use crate::db::pool::DbPool;
use crate::db::projects::list_projects;
use crate::db::time_logs;
use crate::errors::AppResult;
use crate::models::time_log::TimeLog;
use crate::utils::colors::{RESET, color_for_status, colorize_optional};
use crate::utils::formatting::{opt_or_dash, yes_no};
use crate::utils::money::format_amount;
use crate::utils::table::{Column, Table};
use serde::Serialize;

fn separator(cfg: &Config) -> char {
    cfg.separator_char.chars().next().unwrap_or('-')
}

fn print_json<T: Serialize>(rows: &[T]) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn amount_cell(log: &TimeLog) -> AppResult<String> {
    let amount = match (&log.paid_amount, &log.currency) {
        (Some(paid), Some(cur)) => Some(format_amount(cur, *paid)),
        _ if log.is_paid => None,
        _ => log.billable_amount()?.map(|(cur, a)| format_amount(&cur, a)),
    };
    Ok(colorize_optional(&opt_or_dash(amount)))
}

fn time_log_table(logs: &[TimeLog], sep: char) -> AppResult<Table> {
    let mut table = Table::new(
        vec![
            Column::new("ID", 5),
            Column::new("USER", 5),
            Column::new("PROJ", 5),
            Column::new("DATE", 10),
            Column::new("HOURS", 6),
            Column::new("STATUS", 9),
            Column::new("PAID", 4),
            Column::new("BILL", 4),
            Column::new("AMOUNT", 14),
            Column::new("NOTE", 30),
        ],
        sep,
    );

    for log in logs {
        let status = format!(
            "{}{}{}",
            color_for_status(log.status),
            log.status.to_db_str(),
            RESET
        );
        table.add_row(vec![
            log.id.to_string(),
            log.user_id.to_string(),
            log.project_id.to_string(),
            log.work_date().to_string(),
            log.duration.to_string(),
            status,
            yes_no(log.is_paid).to_string(),
            yes_no(!log.non_billable).to_string(),
            amount_cell(log)?,
            log.note.chars().take(30).collect(),
        ]);
    }
    Ok(table)
}

pub struct ListLogic;

impl ListLogic {
    pub fn print(
        pool: &DbPool,
        resource: Resource,
        params: &FilterParams,
        cfg: &Config,
        json: bool,
    ) -> AppResult<()> {
        let query = resource.query(params);
        let sep = separator(cfg);
        let conn = &pool.conn;

        let (table, count) = match resource {
            Resource::TimeLogs => {
                let logs = time_logs::list(conn, &query)?;
                if json {
                    return print_json(&logs);
                }
                (time_log_table(&logs, sep)?, logs.len())
            }
            Resource::Projects => {
                let projects = list_projects(conn, &query)?;
                if json {
                    return print_json(&projects);
                }
                let mut t = Table::new(
                    vec![
                        Column::new("ID", 5),
                        Column::new("NAME", 24),
                        Column::new("CLIENT", 6),
                        Column::new("OWNER", 6),
                        Column::new("RATE", 14),
                    ],
                    sep,
                );
                for p in &projects {
                    let rate = if p.billing.non_monetary {
                        "non-monetary".to_string()
                    } else {
                        opt_or_dash(p.billing.hourly_rate.map(|r| {
                            format_amount(p.billing.currency.as_deref().unwrap_or(&cfg.default_currency), r)
                        }))
                    };
                    t.add_row(vec![
                        p.id.to_string(),
                        p.name.clone(),
                        opt_or_dash(p.client_id),
                        p.owner_id.to_string(),
                        colorize_optional(&rate),
                    ]);
                }
                (t, projects.len())
            }
            Resource::Tasks => {
                let tasks = list_with(conn, &query, map_task)?;
                if json {
                    return print_json(&tasks);
                }
                let mut t = Table::new(
                    vec![
                        Column::new("ID", 5),
                        Column::new("PROJ", 5),
                        Column::new("NAME", 30),
                        Column::new("STATUS", 6),
                    ],
                    sep,
                );
                for k in &tasks {
                    t.add_row(vec![
                        k.id.to_string(),
                        k.project_id.to_string(),
                        k.name.clone(),
                        k.status.to_db_str().to_string(),
                    ]);
                }
                (t, tasks.len())
            }
            Resource::Clients => {
                let clients = list_with(conn, &query, map_client)?;
                if json {
                    return print_json(&clients);
                }
                let mut t = Table::new(
                    vec![
                        Column::new("ID", 5),
                        Column::new("NAME", 24),
                        Column::new("EMAIL", 28),
                    ],
                    sep,
                );
                for c in &clients {
                    t.add_row(vec![c.id.to_string(), c.name.clone(), colorize_optional(&c.email)]);
                }
                (t, clients.len())
            }
            Resource::Invoices => {
                let invoices = list_with(conn, &query, map_invoice)?;
                if json {
                    return print_json(&invoices);
                }
                let mut t = Table::new(
                    vec![
                        Column::new("ID", 5),
                        Column::new("NUMBER", 12),
                        Column::new("CLIENT", 6),
                        Column::new("PROJ", 5),
                        Column::new("DATE", 10),
                        Column::new("STATUS", 6),
                        Column::new("TOTAL", 14),
                    ],
                    sep,
                );
                for i in &invoices {
                    t.add_row(vec![
                        i.id.to_string(),
                        i.number.clone(),
                        i.client_id.to_string(),
                        opt_or_dash(i.project_id),
                        i.issue_date.to_string(),
                        i.status.to_db_str().to_string(),
                        format_amount(&i.currency, i.total),
                    ]);
                }
                (t, invoices.len())
            }
        };

        if count == 0 {
            println!("No rows match the given filters.");
            return Ok(());
        }
        print!("{}", table.render());
        println!("{count} row(s)");
        Ok(())
    }
}
