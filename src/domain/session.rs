use serde::{Deserialize, Serialize};

/// Role attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

/// The authenticated party performing an operation.
///
/// Passed explicitly into every client method; nothing reads the current
/// user from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), role: Role::Admin }
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), role: Role::Customer }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins see every row; customers only rows they own.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}
