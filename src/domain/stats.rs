use serde::Serialize;

use super::{Booking, BookingStatus, Order, OrderStatus};

/// Per-status counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub ready: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl OrderStats {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut stats = Self::default();
        for order in orders {
            stats.total += 1;
            match order.status() {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::InProgress => stats.in_progress += 1,
                OrderStatus::Ready => stats.ready += 1,
                OrderStatus::Completed => stats.completed += 1,
                OrderStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    /// Orders still on the shop floor.
    pub fn active(&self) -> usize {
        self.pending + self.in_progress + self.ready
    }
}

/// Booking counts for the admin's appointment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
}

impl BookingStats {
    pub fn from_bookings<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        let mut stats = Self::default();
        for booking in bookings {
            stats.total += 1;
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
                BookingStatus::Completed => stats.completed += 1,
                BookingStatus::Cancelled => {}
            }
        }
        stats
    }
}
