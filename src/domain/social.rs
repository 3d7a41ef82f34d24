use serde::{Deserialize, Serialize};

use crate::store::OrderBy;
use crate::validate::{require, url, Validate, ValidationError};
use crate::Record;

/// A footer link to one of the brand's social profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "social_links", label = "Social link")]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub url: String,
    /// Icon name, e.g. "Instagram".
    pub icon: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl SocialLink {
    pub fn listing_order() -> OrderBy {
        OrderBy::asc("platform")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinkDraft {
    pub platform: String,
    pub url: String,
    pub icon: String,
    pub active: bool,
}

impl Validate for SocialLinkDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("platform", &self.platform)?;
        url("url", &self.url)?;
        require("icon", &self.icon)
    }
}
