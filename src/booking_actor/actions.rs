use crate::domain::{Booking, BookingReply};

/// Custom actions for Booking rows.
#[derive(Debug, Clone)]
pub enum BookingAction {
    /// Sets `admin_reply`, `replied_at` and optionally the status.
    Reply(BookingReply),
}

#[derive(Debug, Clone)]
pub enum BookingActionResult {
    Replied(Booking),
}
