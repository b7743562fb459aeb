use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// An immutable status-change record in an order's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order_id: String,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending an update to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdateCreate {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub photo_url: Option<String>,
}

impl OrderUpdateCreate {
    pub fn new(status: OrderStatus) -> Self {
        Self { status, note: None, photo_url: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

/// Append-only log of updates for one order, kept in creation order.
///
/// There is no edit or remove operation. Timestamps never go backwards: an
/// entry stamped earlier than its predecessor is clamped to the predecessor's
/// time, so the last entry is always the most recent one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdateLog {
    entries: Vec<OrderUpdate>,
}

impl OrderUpdateLog {
    pub fn append(&mut self, order_id: &str, draft: OrderUpdateCreate, at: DateTime<Utc>) -> OrderUpdate {
        let created_at = self.latest().map_or(at, |last| at.max(last.created_at));
        let update = OrderUpdate {
            id: format!("{}/update_{}", order_id, self.entries.len() + 1),
            order_id: order_id.to_string(),
            status: draft.status,
            note: non_blank(draft.note),
            photo_url: non_blank(draft.photo_url),
            created_at,
        };
        self.entries.push(update.clone());
        update
    }

    pub fn latest(&self) -> Option<&OrderUpdate> {
        self.entries.last()
    }

    /// Status of the latest update, or `pending` for an empty log.
    pub fn current_status(&self) -> OrderStatus {
        self.latest().map_or(OrderStatus::Pending, |update| update.status)
    }

    /// Progress order.
    pub fn oldest_first(&self) -> impl Iterator<Item = &OrderUpdate> {
        self.entries.iter()
    }

    /// Display order.
    pub fn newest_first(&self) -> impl Iterator<Item = &OrderUpdate> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Treats empty or whitespace-only form values as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
