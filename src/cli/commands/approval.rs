use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval::ApprovalEngine;
use crate::core::events::{EventSink, NullSink};
use crate::db::notifications::SqliteNotifier;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::status::TimeLogStatus;
use crate::models::time_log::TimeLog;
use crate::ui::messages::success;
use crate::utils::money::format_amount;

use super::open_pool;

fn run<S: EventSink>(
    pool: &mut DbPool,
    sink: &S,
    cfg: &Config,
    id: i64,
    target: TimeLogStatus,
    approver: i64,
    comment: Option<String>,
) -> AppResult<TimeLog> {
    let mut engine = ApprovalEngine::new(pool, sink, &cfg.default_currency);
    engine.transition(id, target, approver, comment)
}

/// Handles both `approve` and `reject`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (id, target, approver, comment) = match cmd {
        Commands::Approve {
            id,
            approver,
            comment,
        } => (*id, TimeLogStatus::Approved, *approver, comment.clone()),
        Commands::Reject {
            id,
            approver,
            comment,
        } => (*id, TimeLogStatus::Rejected, *approver, comment.clone()),
        _ => return Ok(()),
    };

    let mut pool = open_pool(cfg)?;
    let log = if cfg.notify_on_transition {
        run(&mut pool, &SqliteNotifier, cfg, id, target, approver, comment)?
    } else {
        run(&mut pool, &NullSink, cfg, id, target, approver, comment)?
    };

    match target {
        TimeLogStatus::Approved => {
            let paid = match (&log.paid_amount, &log.currency) {
                (Some(a), Some(c)) => format_amount(c, *a),
                _ => "no monetary amount".to_string(),
            };
            success(format!("Time log #{id} approved and marked paid: {paid}."));
        }
        _ => success(format!("Time log #{id} rejected.")),
    }

    Ok(())
}
