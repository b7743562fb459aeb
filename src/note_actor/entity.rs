use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::order_update::non_blank;
use crate::domain::{CustomerNote, CustomerNoteCreate};

impl Entity for CustomerNote {
    type Id = String;
    type CreatePayload = CustomerNoteCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: CustomerNoteCreate) -> Result<Self, String> {
        let note = payload.note.trim().to_string();
        if note.is_empty() {
            return Err("Note text is required".to_string());
        }
        let customer_email = payload.customer_email.trim().to_string();
        if customer_email.is_empty() {
            return Err("Note must name the customer's email".to_string());
        }
        if payload.admin_id.is_empty() {
            return Err("Note must record its author".to_string());
        }
        Ok(Self {
            id,
            customer_email,
            customer_id: non_blank(payload.customer_id),
            admin_id: payload.admin_id,
            note,
            note_type: payload.note_type,
            created_at: Utc::now(),
        })
    }

    /// Notes are written once; correct one by deleting it and adding another.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Notes cannot be edited".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
