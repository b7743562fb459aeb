use chrono::Utc;

use super::actions::{BookingAction, BookingActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Booking, BookingCreate, BookingStatus};

impl Entity for Booking {
    type Id = String;
    type CreatePayload = BookingCreate;
    type Patch = ();
    type Action = BookingAction;
    type ActionResult = BookingActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    /// New bookings always start `pending` with no reply.
    fn from_create(id: String, payload: BookingCreate) -> Result<Self, String> {
        let payload = payload.validated()?;
        let now = Utc::now();
        Ok(Self {
            id,
            customer_id: payload.customer_id,
            customer_name: payload.customer_name,
            customer_email: payload.customer_email,
            customer_phone: payload.customer_phone,
            service_type: payload.service_type,
            booking_date: payload.booking_date,
            booking_time: payload.booking_time,
            notes: payload.notes,
            status: BookingStatus::Pending,
            admin_reply: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Bookings are changed by replying to them".to_string())
    }

    fn handle_action(&mut self, action: BookingAction) -> Result<BookingActionResult, String> {
        match action {
            BookingAction::Reply(reply) => {
                self.apply_reply(reply, Utc::now());
                Ok(BookingActionResult::Replied(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequential_ids, FrameworkError, ResourceActor};
    use crate::domain::BookingReply;
    use chrono::{NaiveDate, NaiveTime};

    #[tokio::test]
    async fn test_reply_action_updates_row() {
        let (actor, client) = ResourceActor::<Booking>::new("bookings", 8, 8, sequential_ids("booking"));
        tokio::spawn(actor.run());

        let id = client
            .create(BookingCreate::new(
                "Ada Obi",
                "ada@example.com",
                "Consultation",
                NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ))
            .await
            .unwrap();
        assert!(matches!(client.update(id.clone(), ()).await, Err(FrameworkError::Rejected(_))));

        let BookingActionResult::Replied(booking) = client
            .perform_action(
                id.clone(),
                BookingAction::Reply(BookingReply::new("See you then").with_status(BookingStatus::Confirmed)),
            )
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.replied_at.is_some());
        assert_eq!(client.get(id).await.unwrap(), Some(booking));
    }
}
