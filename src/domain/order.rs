use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::order_update::non_blank;
use super::{OrderUpdate, OrderUpdateCreate, OrderUpdateLog};
use crate::progress::{stage_index, Progress};

/// Lifecycle state of an order.
///
/// `pending < in_progress < ready < completed` along the pipeline;
/// `cancelled` is terminal and not comparable to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Badge label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl PartialOrd for OrderStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (stage_index(*self), stage_index(*other)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// A unit of tailoring work commissioned by a customer.
///
/// The status is not stored separately: it is read from the update log, so
/// the snapshot and the audit trail cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub title: String,
    pub description: Option<String>,
    pub estimated_completion: Option<NaiveDate>,
    pub total_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    updates: OrderUpdateLog,
}

/// Payload for creating a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub customer_id: String,
    pub title: String,
    pub description: Option<String>,
    pub estimated_completion: Option<NaiveDate>,
    pub total_amount: Option<f64>,
}

impl OrderCreate {
    pub fn new(customer_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            title: title.into(),
            description: None,
            estimated_completion: None,
            total_amount: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_estimated_completion(mut self, date: NaiveDate) -> Self {
        self.estimated_completion = Some(date);
        self
    }

    pub fn with_total_amount(mut self, amount: f64) -> Self {
        self.total_amount = Some(amount);
        self
    }

    /// Checks field rules and returns the normalised payload.
    pub fn validated(self) -> Result<Self, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Order title is required".to_string());
        }
        if self.customer_id.trim().is_empty() {
            return Err("Order must belong to a customer".to_string());
        }
        if let Some(amount) = self.total_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(format!("Invalid total amount: {}", amount));
            }
        }
        Ok(Self {
            title,
            description: non_blank(self.description),
            ..self
        })
    }
}

impl Order {
    /// Builds a fresh order with an empty update log.
    pub fn open(id: String, payload: OrderCreate, at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id: payload.customer_id,
            title: payload.title,
            description: payload.description,
            estimated_completion: payload.estimated_completion,
            total_amount: payload.total_amount,
            created_at: at,
            updated_at: at,
            updates: OrderUpdateLog::default(),
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.updates.current_status()
    }

    pub fn updates(&self) -> &OrderUpdateLog {
        &self.updates
    }

    /// When the order first reached `status`, walking the log oldest first.
    /// `pending` without an explicit entry counts from creation.
    pub fn reached_at(&self, status: OrderStatus) -> Option<DateTime<Utc>> {
        let entered = self
            .updates
            .oldest_first()
            .find(|update| update.status == status)
            .map(|update| update.created_at);
        match status {
            OrderStatus::Pending => entered.or(Some(self.created_at)),
            _ => entered,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.status())
    }

    /// Appends to the log and bumps `updated_at` in one step.
    pub fn record_update(&mut self, draft: OrderUpdateCreate, at: DateTime<Utc>) -> OrderUpdate {
        let update = self.updates.append(&self.id, draft, at);
        self.updated_at = update.created_at;
        update
    }

    /// Flat row shape with the derived status filled in.
    pub fn row(&self) -> OrderRow<'_> {
        OrderRow {
            id: &self.id,
            customer_id: &self.customer_id,
            title: &self.title,
            description: self.description.as_deref(),
            status: self.status(),
            estimated_completion: self.estimated_completion,
            total_amount: self.total_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderRow<'a> {
    pub id: &'a str,
    pub customer_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: OrderStatus,
    pub estimated_completion: Option<NaiveDate>,
    pub total_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
    }

    #[test]
    fn test_pipeline_ordering() {
        assert!(OrderStatus::Pending < OrderStatus::InProgress);
        assert!(OrderStatus::Ready < OrderStatus::Completed);
        assert_eq!(OrderStatus::Cancelled.partial_cmp(&OrderStatus::Pending), None);
        assert_eq!(OrderStatus::Completed.partial_cmp(&OrderStatus::Cancelled), None);
        assert_eq!(
            OrderStatus::Cancelled.partial_cmp(&OrderStatus::Cancelled),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_new_order_is_pending() {
        let payload = OrderCreate::new("customer_1", "Custom Silk Blouse").validated().unwrap();
        let order = Order::open("order_1".into(), payload, Utc::now());

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.updates().len(), 0);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_record_update_moves_status() {
        let payload = OrderCreate::new("customer_1", "Agbada").validated().unwrap();
        let opened = Utc::now();
        let mut order = Order::open("order_1".into(), payload, opened);

        let update = order.record_update(
            OrderUpdateCreate::new(OrderStatus::InProgress),
            opened + chrono::Duration::hours(1),
        );

        assert_eq!(order.status(), OrderStatus::InProgress);
        assert_eq!(order.updated_at, update.created_at);
        assert_eq!(order.row().status, OrderStatus::InProgress);
    }

    #[test]
    fn test_reached_at_uses_first_entry() {
        let payload = OrderCreate::new("customer_1", "Kaftan").validated().unwrap();
        let opened = Utc::now();
        let mut order = Order::open("order_1".into(), payload, opened);
        let cut = opened + chrono::Duration::hours(2);
        order.record_update(OrderUpdateCreate::new(OrderStatus::InProgress), cut);
        order.record_update(OrderUpdateCreate::new(OrderStatus::Ready), cut + chrono::Duration::days(1));
        order.record_update(
            OrderUpdateCreate::new(OrderStatus::InProgress).with_note("Sleeves re-cut"),
            cut + chrono::Duration::days(2),
        );

        assert_eq!(order.reached_at(OrderStatus::Pending), Some(opened));
        assert_eq!(order.reached_at(OrderStatus::InProgress), Some(cut));
        assert_eq!(order.reached_at(OrderStatus::Completed), None);
    }

    #[test]
    fn test_validation_rules() {
        assert!(OrderCreate::new("customer_1", "  ").validated().is_err());
        assert!(OrderCreate::new("", "Kaftan").validated().is_err());
        assert!(OrderCreate::new("customer_1", "Kaftan")
            .with_total_amount(-5.0)
            .validated()
            .is_err());

        let payload = OrderCreate::new("customer_1", "  Kaftan ")
            .with_description("")
            .with_total_amount(45000.0)
            .validated()
            .unwrap();
        assert_eq!(payload.title, "Kaftan");
        assert_eq!(payload.description, None);
    }
}
