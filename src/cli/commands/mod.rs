pub mod add;
pub mod approval;
pub mod catalog;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod notifications;
pub mod stats;

use crate::config::Config;
use crate::core::filter::FilterParams;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    open_db(&cfg.database)
}

/// `--query` string first, then each `--filter KEY=VALUE` on top.
pub(crate) fn filter_params(pairs: &[String], query: Option<&str>) -> AppResult<FilterParams> {
    let base = query
        .map(FilterParams::from_query_string)
        .unwrap_or_default();
    Ok(base.merge(FilterParams::from_pairs(pairs)?))
}
