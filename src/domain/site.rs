//! Single-row site settings: the public contact details and the homepage counters.
//!
//! Both tables hold exactly one row that the dashboard edits in place; read it
//! with [`Records::first`](crate::Records::first).

use serde::{Deserialize, Serialize};

use crate::validate::{email, require, within, Validate, ValidationError};
use crate::Record;

/// Contact details shown in the footer and on the contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "contact_info", label = "Contact info")]
pub struct ContactInfo {
    pub id: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfoPatch {
    pub email: String,
    pub phone: String,
}

impl Validate for ContactInfoPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        email("email", &self.email)?;
        require("phone", &self.phone)
    }
}

/// Homepage counters ("10,000+ momos served").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "dashboard_stats", label = "Stats")]
pub struct DashboardStats {
    pub id: String,
    #[serde(default)]
    pub momos_served: i64,
    #[serde(default)]
    pub happy_customers: i64,
    #[serde(default)]
    pub varieties: i64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsPatch {
    pub momos_served: i64,
    pub happy_customers: i64,
    pub varieties: i64,
}

impl Validate for DashboardStatsPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        within("momos_served", self.momos_served, 0, i64::MAX)?;
        within("happy_customers", self.happy_customers, 0, i64::MAX)?;
        within("varieties", self.varieties, 0, i64::MAX)
    }
}
