//! CSV batch import of time logs for one user.
//!
//! Columns: `project_id,task_id,start,end,duration,note,non_billable`.
//! Either `start`+`end` or `duration` must be filled on each row. The batch
//! runs in a single transaction: one bad row imports nothing.

use crate::core::add::AddLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::NewTimeLog;
use crate::utils::money::parse_decimal;
use crate::utils::time::parse_datetime;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ImportRow {
    project_id: i64,
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    non_billable: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ImportRow {
    fn into_new(self, user_id: i64) -> AppResult<NewTimeLog> {
        let start = non_empty(&self.start)
            .map(|s| parse_datetime(s).ok_or_else(|| AppError::InvalidTime(s.to_string())))
            .transpose()?;
        let end = non_empty(&self.end)
            .map(|s| parse_datetime(s).ok_or_else(|| AppError::InvalidTime(s.to_string())))
            .transpose()?;
        let duration = non_empty(&self.duration).map(parse_decimal).transpose()?;
        let non_billable = matches!(
            non_empty(&self.non_billable).map(str::to_lowercase).as_deref(),
            Some("1" | "true" | "yes" | "y")
        );

        Ok(NewTimeLog {
            user_id,
            project_id: self.project_id,
            task_id: self.task_id,
            start,
            end,
            duration,
            non_billable,
            note: non_empty(&self.note).unwrap_or_default().to_string(),
            ..Default::default()
        })
    }
}

pub struct ImportLogic;

impl ImportLogic {
    pub fn import_file(
        pool: &mut DbPool,
        path: &Path,
        user_id: i64,
        default_currency: &str,
    ) -> AppResult<usize> {
        let file = std::fs::File::open(path)
            .map_err(|e| AppError::Import(format!("cannot open {}: {e}", path.display())))?;
        Self::import_reader(pool, file, user_id, default_currency)
    }

    /// Import every row of `reader`; returns the number of logs created.
    pub fn import_reader<R: Read>(
        pool: &mut DbPool,
        reader: R,
        user_id: i64,
        default_currency: &str,
    ) -> AppResult<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let tx = pool.conn.transaction()?;
        let mut count = 0;

        for (idx, record) in rdr.deserialize::<ImportRow>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let row = record.map_err(|e| AppError::Import(format!("line {line}: {e}")))?;
            let new = row
                .into_new(user_id)
                .map_err(|e| AppError::Import(format!("line {line}: {e}")))?;
            AddLogic::create(&tx, &new, &[], default_currency)
                .map_err(|e| AppError::Import(format!("line {line}: {e}")))?;
            count += 1;
        }

        if count == 0 {
            return Err(AppError::Import("no rows to import".into()));
        }

        ttlog(
            &tx,
            "import",
            &format!("user {user_id}"),
            &format!("{count} time logs imported"),
        )?;
        tx.commit()?;

        Ok(count)
    }
}
