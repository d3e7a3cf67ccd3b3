use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::export::ExportLogic;

use super::{filter_params, open_pool};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        filters,
        force,
    } = cmd
    {
        let params = filter_params(filters, None)?;
        let pool = open_pool(cfg)?;
        let n = ExportLogic::export(&pool, *format, file, &params, *force)?;
        if n > 0 {
            ttlog(
                &pool.conn,
                "export",
                file,
                &format!("{n} time logs exported as {}", format.as_str()),
            )?;
        }
    }
    Ok(())
}
