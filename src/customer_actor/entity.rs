use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::order_update::non_blank;
use crate::domain::{CustomerCreate, CustomerPatch, CustomerProfile};

fn check_email(email: Option<&str>) -> Result<(), String> {
    match email {
        Some(email) if !email.contains('@') => Err(format!("Invalid email: {}", email)),
        _ => Ok(()),
    }
}

impl Entity for CustomerProfile {
    type Id = String;
    type CreatePayload = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.id)
    }

    /// Creates a profile. At least a name or an email is required.
    fn from_create(id: String, payload: CustomerCreate) -> Result<Self, String> {
        let full_name = non_blank(payload.full_name);
        let email = non_blank(payload.email);
        if full_name.is_none() && email.is_none() {
            return Err("Customer needs a name or an email".to_string());
        }
        check_email(email.as_deref())?;
        let now = Utc::now();
        Ok(Self {
            id,
            full_name,
            email,
            phone: non_blank(payload.phone),
            created_at: now,
            updated_at: now,
        })
    }

    /// # Fields Updated
    /// - `full_name`, `email`, `phone` when present and non-blank
    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), String> {
        let email = non_blank(patch.email);
        check_email(email.as_deref())?;
        if let Some(full_name) = non_blank(patch.full_name) {
            self.full_name = Some(full_name);
        }
        if let Some(email) = email {
            self.email = Some(email);
        }
        if let Some(phone) = non_blank(patch.phone) {
            self.phone = Some(phone);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
