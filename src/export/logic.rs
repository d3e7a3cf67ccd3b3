use crate::core::filter::{FilterParams, Resource};
use crate::db::pool::DbPool;
use crate::db::{tags, time_logs};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::TimeLogExport;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the time logs selected by `params`.
    ///
    /// `file` must be an absolute path. Returns the number of rows written.
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        params: &FilterParams,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows = load_rows(pool, params)?;
        if rows.is_empty() {
            warning("No time logs match the given filters.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}

fn load_rows(pool: &DbPool, params: &FilterParams) -> AppResult<Vec<TimeLogExport>> {
    let logs = time_logs::list(&pool.conn, &Resource::TimeLogs.query(params))?;

    let mut out = Vec::with_capacity(logs.len());
    for log in &logs {
        let names = tags::tags_for(&pool.conn, log.id)?;
        out.push(TimeLogExport::from_log(log, &names));
    }
    Ok(out)
}
