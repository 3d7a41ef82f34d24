use serde::{Deserialize, Serialize};

use crate::validate::{require, require_if_present, within, Validate, ValidationError};
use crate::{OrderedRecord, Record};

pub const MIN_SPICE: u8 = 1;
pub const MAX_SPICE: u8 = 5;

/// A dish on the public menu, shown in `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record, OrderedRecord)]
#[record(collection = "menu_items", label = "Item")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display price, currency included (e.g. "₹120").
    pub price: String,
    #[serde(default = "default_spice")]
    pub spice_level: u8,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_spice() -> u8 {
    MIN_SPICE
}

fn default_active() -> bool {
    true
}

/// Form input for a new dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub spice_level: u8,
    pub is_veg: bool,
    pub image_url: Option<String>,
    pub active: bool,
}

impl MenuItemDraft {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            ..Self::default()
        }
    }
}

impl Default for MenuItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            spice_level: MIN_SPICE,
            is_veg: false,
            image_url: None,
            active: true,
        }
    }
}

impl Validate for MenuItemDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("price", &self.price)?;
        within("spice_level", self.spice_level, MIN_SPICE.into(), MAX_SPICE.into())
    }
}

/// Edited fields of a dish. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_veg: Option<bool>,
    /// `Some(None)` clears the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

impl Validate for MenuItemPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_present("name", self.name.as_deref())?;
        require_if_present("price", self.price.as_deref())?;
        match self.spice_level {
            Some(level) => within("spice_level", level, MIN_SPICE.into(), MAX_SPICE.into()),
            None => Ok(()),
        }
    }
}
