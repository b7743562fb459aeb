use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::order_update::non_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }
}

/// Canned reply the admin can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTemplate {
    pub label: &'static str,
    pub text: &'static str,
}

pub const REPLY_TEMPLATES: [ReplyTemplate; 4] = [
    ReplyTemplate {
        label: "Confirm Appointment",
        text: "Your appointment has been confirmed. We look forward to seeing you!",
    },
    ReplyTemplate {
        label: "Request Reschedule",
        text: "We need to reschedule your appointment. Please contact us to arrange a new time.",
    },
    ReplyTemplate {
        label: "Reminder",
        text: "This is a reminder for your upcoming appointment. Please arrive 10 minutes early.",
    },
    ReplyTemplate {
        label: "Thank You",
        text: "Thank you for visiting us. We hope you were satisfied with our service!",
    },
];

/// An appointment request. Walk-in bookings may have no linked customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service_type: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub admin_reply: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Stores the reply, moves the status if one was picked, stamps `replied_at`.
    pub fn apply_reply(&mut self, reply: BookingReply, at: DateTime<Utc>) {
        self.admin_reply = non_blank(Some(reply.reply));
        if let Some(status) = reply.status {
            self.status = status;
        }
        self.replied_at = Some(at);
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingCreate {
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service_type: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
}

impl BookingCreate {
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        service_type: impl Into<String>,
        booking_date: NaiveDate,
        booking_time: NaiveTime,
    ) -> Self {
        Self {
            customer_id: None,
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: None,
            service_type: service_type.into(),
            booking_date,
            booking_time,
            notes: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn validated(self) -> Result<Self, String> {
        let customer_name = self.customer_name.trim().to_string();
        let customer_email = self.customer_email.trim().to_string();
        let service_type = self.service_type.trim().to_string();
        if customer_name.is_empty() {
            return Err("Booking needs the customer's name".to_string());
        }
        if !customer_email.contains('@') {
            return Err(format!("Invalid email: {}", customer_email));
        }
        if service_type.is_empty() {
            return Err("Booking needs a service type".to_string());
        }
        Ok(Self {
            customer_id: non_blank(self.customer_id),
            customer_name,
            customer_email,
            customer_phone: non_blank(self.customer_phone),
            service_type,
            notes: non_blank(self.notes),
            ..self
        })
    }
}

/// Admin response to a booking. Without a status the booking keeps its current one.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReply {
    pub reply: String,
    pub status: Option<BookingStatus>,
}

impl BookingReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), status: None }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitting() -> BookingCreate {
        BookingCreate::new(
            "Ada Obi",
            "ada@example.com",
            "Fitting",
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_create_validation() {
        assert!(fitting().with_notes(" ").validated().unwrap().notes.is_none());
        let mut nameless = fitting();
        nameless.customer_name = "  ".to_string();
        assert!(nameless.validated().is_err());
        let mut bad_email = fitting();
        bad_email.customer_email = "ada".to_string();
        assert!(bad_email.validated().is_err());
    }

    #[test]
    fn test_reply_keeps_status_unless_given() {
        let now = Utc::now();
        let payload = fitting().validated().unwrap();
        let mut booking = Booking {
            id: "booking_1".into(),
            customer_id: None,
            customer_name: payload.customer_name,
            customer_email: payload.customer_email,
            customer_phone: None,
            service_type: payload.service_type,
            booking_date: payload.booking_date,
            booking_time: payload.booking_time,
            notes: None,
            status: BookingStatus::Pending,
            admin_reply: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        };

        booking.apply_reply(BookingReply::new(REPLY_TEMPLATES[2].text), now);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.replied_at, Some(now));

        booking.apply_reply(BookingReply::new(REPLY_TEMPLATES[0].text).with_status(BookingStatus::Confirmed), now);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.admin_reply.as_deref(), Some(REPLY_TEMPLATES[0].text));
    }
}
