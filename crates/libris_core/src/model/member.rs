//! Member records and the add-member input shape.

use super::{optional_text, required_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned member identifier.
pub type MemberId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub full_name: String,
    pub email: Option<String>,
}

/// Input for registering a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub full_name: String,
    pub email: Option<String>,
}

impl NewMember {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Trims the name and email; a blank email is stored as absent.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: required_text("full_name", &self.full_name)?,
            email: optional_text(self.email),
        })
    }
}
