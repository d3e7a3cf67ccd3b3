//! Delivery seam for approval events.

use crate::errors::AppResult;
use crate::models::approval_event::ApprovalEvent;
use rusqlite::Connection;

/// Receives each approval event once, after the transition has committed.
/// Errors are reported by the engine and never undo the transition.
pub trait EventSink {
    fn publish(&self, conn: &Connection, event: &ApprovalEvent) -> AppResult<()>;
}

/// Sink used when notifications are disabled in the configuration.
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _conn: &Connection, _event: &ApprovalEvent) -> AppResult<()> {
        Ok(())
    }
}
