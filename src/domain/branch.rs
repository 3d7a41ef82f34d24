use serde::{Deserialize, Serialize};

use crate::store::OrderBy;
use crate::validate::{require, url, Validate, ValidationError};
use crate::Record;

/// A shop location. The main branch is listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "shop_branches", label = "Branch")]
pub struct ShopBranch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub working_hours: String,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub is_main: Option<bool>,
    /// Missing means active.
    #[serde(default)]
    pub active: Option<bool>,
}

impl ShopBranch {
    pub fn listing_order() -> OrderBy {
        OrderBy::desc("is_main")
    }

    pub fn is_main(&self) -> bool {
        self.is_main.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopBranchDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub working_hours: String,
    pub map_url: Option<String>,
    pub is_main: bool,
    pub active: bool,
}

impl Validate for ShopBranchDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("address", &self.address)?;
        require("phone", &self.phone)?;
        require("working_hours", &self.working_hours)?;
        match self.map_url.as_deref().filter(|link| !link.trim().is_empty()) {
            Some(link) => url("map_url", link),
            None => Ok(()),
        }
    }
}
