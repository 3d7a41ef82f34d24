use serde::{Deserialize, Serialize};

use crate::validate::{email, require, Validate, ValidationError};
use crate::Record;

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "contact_messages", label = "Message")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub read: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ContactMessage {
    pub fn is_read(&self) -> bool {
        self.read.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl Validate for ContactMessageDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        email("email", &self.email)?;
        require("phone", &self.phone)?;
        require("message", &self.message)
    }
}

/// Patch that marks a message read or unread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFlag {
    pub read: bool,
}

impl Validate for ReadFlag {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
