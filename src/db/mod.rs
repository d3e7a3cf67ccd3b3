pub mod access;
pub mod catalog;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod notifications;
pub mod pool;
pub mod projects;
pub mod query;
pub mod rates;
pub mod row;
pub mod stats;
pub mod tags;
pub mod time_logs;
