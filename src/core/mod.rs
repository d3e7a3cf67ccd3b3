pub mod add;
pub mod approval;
pub mod catalog;
pub mod del;
pub mod edit;
pub mod events;
pub mod filter;
pub mod import;
pub mod list;
pub mod log;
pub mod policy;
pub mod rates;
pub mod stats;
