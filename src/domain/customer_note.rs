use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    #[default]
    General,
    Measurement,
    Preference,
    Issue,
    Followup,
    Compliment,
}

impl NoteType {
    pub fn label(self) -> &'static str {
        match self {
            NoteType::General => "General",
            NoteType::Measurement => "Measurement",
            NoteType::Preference => "Preference",
            NoteType::Issue => "Issue",
            NoteType::Followup => "Follow-up",
            NoteType::Compliment => "Compliment",
        }
    }
}

/// Private admin note about a customer, keyed by email since bookings may
/// not be linked to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerNote {
    pub id: String,
    pub customer_email: String,
    pub customer_id: Option<String>,
    pub admin_id: String,
    pub note: String,
    pub note_type: NoteType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerNoteCreate {
    pub customer_email: String,
    pub customer_id: Option<String>,
    /// Filled in from the session by the client.
    pub admin_id: String,
    pub note: String,
    pub note_type: NoteType,
}

impl CustomerNoteCreate {
    pub fn new(customer_email: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            customer_email: customer_email.into(),
            customer_id: None,
            admin_id: String::new(),
            note: note.into(),
            note_type: NoteType::default(),
        }
    }

    pub fn with_type(mut self, note_type: NoteType) -> Self {
        self.note_type = note_type;
        self
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}
