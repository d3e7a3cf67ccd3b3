use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::errors::AppResult;

use super::{filter_params, open_pool};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        resource,
        filters,
        query,
        json,
    } = cmd
    {
        let params = filter_params(filters, query.as_deref())?;
        let pool = open_pool(cfg)?;
        ListLogic::print(&pool, *resource, &params, cfg, *json)?;
    }

    Ok(())
}
