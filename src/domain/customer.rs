use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer profile the admin can attach orders to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerProfile {
    /// Name shown in pickers: full name, then email, then the raw id.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Payload for creating a customer profile.
#[derive(Debug, Clone, Default)]
pub struct CustomerCreate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerCreate {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            email: Some(email.into()),
            phone: None,
        }
    }
}

/// Payload for updating an existing profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
