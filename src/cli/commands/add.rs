use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::errors::AppResult;
use crate::models::time_log::NewTimeLog;
use crate::ui::messages::success;
use crate::utils::formatting::hours2readable;
use crate::utils::money::{format_amount, parse_optional_decimal};
use crate::utils::time::parse_optional_datetime;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        user,
        project,
        task,
        start,
        end,
        hours,
        note,
        non_billable,
        rate,
        currency,
        tags,
    } = cmd
    {
        let new = NewTimeLog {
            user_id: *user,
            project_id: *project,
            task_id: *task,
            start: parse_optional_datetime(start.as_ref())?,
            end: parse_optional_datetime(end.as_ref())?,
            duration: parse_optional_decimal(hours.as_ref())?,
            non_billable: *non_billable,
            note: note.clone(),
            hourly_rate: parse_optional_decimal(rate.as_ref())?,
            currency: currency.clone(),
        };

        let mut pool = open_pool(cfg)?;
        let log = AddLogic::apply(&mut pool, &new, tags, &cfg.default_currency)?;

        let rate_info = match (&log.hourly_rate, &log.currency) {
            (Some(r), Some(c)) => format!(" at {}/h", format_amount(c, *r)),
            _ => String::new(),
        };
        success(format!(
            "Time log #{} created: {} ({}h){} - pending approval",
            log.id,
            hours2readable(log.duration, false),
            log.duration,
            rate_info
        ));
    }

    Ok(())
}
