pub mod approval_event;
pub mod client;
pub mod invoice;
pub mod notification;
pub mod project;
pub mod rate;
pub mod stats;
pub mod status;
pub mod task;
pub mod team;
pub mod time_log;
