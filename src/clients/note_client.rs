use tracing::{info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::domain::{CustomerNote, CustomerNoteCreate, Session};
use crate::note_actor::NoteError;

/// Client for the admin-only customer notes.
#[derive(Clone)]
pub struct NoteClient {
    inner: ResourceClient<CustomerNote>,
}

fn require_admin(session: &Session) -> Result<(), NoteError> {
    if session.is_admin() {
        Ok(())
    } else {
        warn!(user_id = %session.user_id, "Customer notes refused");
        Err(NoteError::AuthorizationError("customer notes are admin only".to_string()))
    }
}

impl NoteClient {
    pub fn new(inner: ResourceClient<CustomerNote>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, session, payload), fields(user_id = %session.user_id, note_type = payload.note_type.label()))]
    pub async fn add_note(&self, session: &Session, mut payload: CustomerNoteCreate) -> Result<String, NoteError> {
        require_admin(session)?;
        payload.admin_id = session.user_id.clone();
        let id = self.inner.create(payload).await?;
        info!(note_id = %id, "Note added");
        Ok(id)
    }

    /// Notes for one customer email, newest first.
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn list_notes(&self, session: &Session, customer_email: String) -> Result<Vec<CustomerNote>, NoteError> {
        require_admin(session)?;
        let email = customer_email.trim().to_string();
        let filter: Predicate<CustomerNote> = Box::new(move |note| note.customer_email == email);
        let mut notes = self.inner.list(Some(filter)).await?;
        notes.reverse();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn delete_note(&self, session: &Session, note_id: String) -> Result<(), NoteError> {
        require_admin(session)?;
        self.inner.delete(note_id).await?;
        info!("Note deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequential_ids, ResourceActor};
    use crate::domain::NoteType;

    fn start() -> NoteClient {
        let (actor, inner) = ResourceActor::<CustomerNote>::new("customer_notes", 8, 8, sequential_ids("note"));
        tokio::spawn(actor.run());
        NoteClient::new(inner)
    }

    #[tokio::test]
    async fn test_add_list_delete() {
        let client = start();
        let admin = Session::admin("owner");

        let first = client
            .add_note(&admin, CustomerNoteCreate::new("ada@example.com", "Prefers a slim fit").with_type(NoteType::Preference))
            .await
            .unwrap();
        client
            .add_note(&admin, CustomerNoteCreate::new("ada@example.com", "Call about hem length").with_type(NoteType::Followup))
            .await
            .unwrap();
        client
            .add_note(&admin, CustomerNoteCreate::new("bola@example.com", "Paid deposit"))
            .await
            .unwrap();

        let notes = client.list_notes(&admin, "ada@example.com".to_string()).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].note, "Call about hem length");
        assert!(notes.iter().all(|n| n.admin_id == "owner"));

        client.delete_note(&admin, first).await.unwrap();
        let notes = client.list_notes(&admin, "ada@example.com".to_string()).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_type, NoteType::Followup);

        let err = client.delete_note(&admin, "note_404".to_string()).await.unwrap_err();
        assert_eq!(err, NoteError::NotFound("note_404".to_string()));
    }

    #[tokio::test]
    async fn test_customers_cannot_read_notes() {
        let client = start();
        let customer = Session::customer("customer_1");

        let err = client.list_notes(&customer, "ada@example.com".to_string()).await.unwrap_err();
        assert!(matches!(err, NoteError::AuthorizationError(_)));
        let err = client
            .add_note(&customer, CustomerNoteCreate::new("ada@example.com", "Great tailor"))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteError::AuthorizationError(_)));
    }
}
