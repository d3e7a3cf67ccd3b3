use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, LogChanges};
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::money::parse_optional_decimal;
use crate::utils::time::parse_optional_datetime;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        user,
        task,
        start,
        end,
        hours,
        note,
        non_billable,
    } = cmd
    {
        let changes = LogChanges {
            task_id: *task,
            start: parse_optional_datetime(start.as_ref())?,
            end: parse_optional_datetime(end.as_ref())?,
            duration: parse_optional_decimal(hours.as_ref())?,
            note: note.clone(),
            non_billable: *non_billable,
        };

        let mut pool = open_pool(cfg)?;
        let log = EditLogic::apply(&mut pool, *id, *user, &changes)?;
        success(format!("Time log #{} updated ({}h).", log.id, log.duration));
    }

    Ok(())
}
