use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::booking_actor::{BookingAction, BookingActionResult, BookingError};
use crate::domain::{Booking, BookingCreate, BookingReply, BookingStats, Session};

/// Client for interacting with the booking actor.
#[derive(Clone)]
pub struct BookingClient {
    inner: ResourceClient<Booking>,
}

impl BookingClient {
    pub fn new(inner: ResourceClient<Booking>) -> Self {
        Self { inner }
    }

    /// Anyone may book. A customer's booking is always linked to their own profile.
    #[instrument(skip(self, session, payload), fields(user_id = %session.user_id, service = %payload.service_type))]
    pub async fn create_booking(&self, session: &Session, mut payload: BookingCreate) -> Result<String, BookingError> {
        if !session.is_admin() {
            payload.customer_id = Some(session.user_id.clone());
        }
        let id = self.inner.create(payload).await?;
        info!(booking_id = %id, "Booking created");
        Ok(id)
    }

    /// Bookings visible to the session, earliest appointment first.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_bookings(&self, session: &Session) -> Result<Vec<Booking>, BookingError> {
        debug!("Sending request");
        let filter: Option<Predicate<Booking>> = if session.is_admin() {
            None
        } else {
            let user_id = session.user_id.clone();
            let own: Predicate<Booking> = Box::new(move |booking| booking.customer_id.as_deref() == Some(user_id.as_str()));
            Some(own)
        };
        let mut bookings = self.inner.list(filter).await?;
        bookings.sort_by_key(|booking| (booking.booking_date, booking.booking_time));
        Ok(bookings)
    }

    /// Records the admin's reply and, if given, the new status.
    #[instrument(skip(self, session, reply), fields(user_id = %session.user_id))]
    pub async fn reply_to_booking(
        &self,
        session: &Session,
        booking_id: String,
        reply: BookingReply,
    ) -> Result<Booking, BookingError> {
        if !session.is_admin() {
            warn!("Booking reply refused");
            return Err(BookingError::AuthorizationError("only the admin can reply to bookings".to_string()));
        }
        let BookingActionResult::Replied(booking) = self
            .inner
            .perform_action(booking_id, BookingAction::Reply(reply))
            .await?;
        info!(booking_id = %booking.id, status = booking.status.label(), "Reply sent");
        Ok(booking)
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn booking_stats(&self, session: &Session) -> Result<BookingStats, BookingError> {
        let bookings = self.list_bookings(session).await?;
        Ok(BookingStats::from_bookings(&bookings))
    }
}
