use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::{require, Validate, ValidationError};
use crate::Record;

/// A dated shop notice ("Closed for Dashain", "New branch opening").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "shop_announcements", label = "Announcement")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub message: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Missing means active.
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Announcement {
    /// Shown on the public page on `today`: active and `start <= today <= end`.
    pub fn is_live(&self, today: NaiveDate) -> bool {
        self.active.unwrap_or(true) && self.start_date <= today && today <= self.end_date
    }
}

/// The announcements the public banner shows on `today`, order preserved.
pub fn live_announcements(items: &[Announcement], today: NaiveDate) -> Vec<Announcement> {
    items.iter().filter(|a| a.is_live(today)).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub title: String,
    pub message: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Validate for AnnouncementDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("message", &self.message)?;
        let start = self
            .start_date
            .ok_or(ValidationError::Missing { field: "start_date" })?;
        let end = self
            .end_date
            .ok_or(ValidationError::Missing { field: "end_date" })?;
        if end < start {
            return Err(ValidationError::malformed(
                "end_date",
                format!("{end} is before start date {start}"),
            ));
        }
        Ok(())
    }
}
