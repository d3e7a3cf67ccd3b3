use crate::core::policy::ensure_can_modify;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::time_logs;
use crate::errors::{AppError, AppResult};

pub struct DeleteLogic;

impl DeleteLogic {
    pub fn apply(pool: &mut DbPool, id: i64, actor_id: i64) -> AppResult<()> {
        let tx = pool.conn.transaction()?;
        let log = time_logs::get(&tx, id)?;
        ensure_can_modify(actor_id, &log)?;

        if time_logs::delete_unpaid(&tx, id)? == 0 {
            return Err(AppError::InvalidState(format!(
                "time log #{id} is paid and can no longer be deleted"
            )));
        }

        ttlog(
            &tx,
            "del",
            &format!("time_log #{id}"),
            &format!("deleted by user {actor_id}"),
        )?;
        tx.commit()?;
        Ok(())
    }
}
