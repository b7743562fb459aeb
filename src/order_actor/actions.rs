use crate::domain::{OrderUpdate, OrderUpdateCreate};

/// Custom actions for Order rows.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Appends a status update to the order's log.
    ///
    /// The log entry and the order's visible status change together, inside a
    /// single message to the order actor.
    RecordUpdate(OrderUpdateCreate),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    Recorded(OrderUpdate),
}
