use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { user, file } = cmd {
        let path = expand_tilde(file);
        let mut pool = open_pool(cfg)?;
        let n = ImportLogic::import_file(&mut pool, &path, *user, &cfg.default_currency)?;
        success(format!("{n} time log(s) imported for user {user}, all pending approval."));
    }

    Ok(())
}
