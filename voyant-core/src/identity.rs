use serde::{Deserialize, Serialize};
use voyant_shared::Masked;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[serde(alias = "AGENT")]
    Organizer,
    #[default]
    Customer,
    #[serde(other)]
    Unknown,
}

/// Profile returned by `/users/auth/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "crate::wire::id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    pub fn full_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    pub fn display_name(&self) -> String {
        self.full_name().unwrap_or_else(|| self.username.clone())
    }
}

/// Role flags derived from the current user. Recomputed on every read, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_organizer: bool,
    pub is_customer: bool,
}

impl RoleFlags {
    pub fn for_user(user: Option<&User>) -> Self {
        match user {
            None => Self::default(),
            Some(user) => Self {
                is_admin: user.role == Role::Admin || user.is_staff,
                is_organizer: user.role == Role::Organizer,
                is_customer: user.role == Role::Customer,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: Masked<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Masked(password.into()),
        }
    }
}

/// Access/refresh pair as issued by the token endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access: Masked<String>,
    #[serde(default)]
    pub refresh: Option<Masked<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Masked<String>,
    #[serde(rename = "password2")]
    pub confirm_password: Masked<String>,
    pub role: Role,
}

impl RegistrationForm {
    /// Local checks run before anything goes over the wire.
    pub fn validate(&self) -> CoreResult<()> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Username and email are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(CoreError::ValidationError("Please enter a valid email address".to_string()));
        }
        if self.password.is_blank() {
            return Err(CoreError::ValidationError("Password is required".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(CoreError::ValidationError("Passwords do not match".to_string()));
        }
        if self.role == Role::Admin {
            return Err(CoreError::ValidationError(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }
        Ok(())
    }
}
