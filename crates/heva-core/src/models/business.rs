//! Business domain model.
//!
//! A business is a small enterprise started by a beneficiary. The
//! owning beneficiary is a weak reference: deleting the beneficiary
//! leaves the business in place.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Planning,
    Active,
    Completed,
    Failed,
}

impl BusinessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessStatus::Planning => "planning",
            BusinessStatus::Active => "active",
            BusinessStatus::Completed => "completed",
            BusinessStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Opaque id, unique within the store. Empty until inserted.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub business_type: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    /// Funding in KSh.
    pub funding_amount: f64,
    pub status: BusinessStatus,
    pub beneficiary_id: String,
    pub county: String,
    #[serde(default)]
    pub employees: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,
}

/// Fields required to create a new business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusiness {
    pub name: String,
    #[serde(rename = "type")]
    pub business_type: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub funding_amount: f64,
    pub status: BusinessStatus,
    pub beneficiary_id: String,
    pub county: String,
    #[serde(default)]
    pub employees: u32,
    #[serde(default)]
    pub monthly_revenue: Option<f64>,
}

impl NewBusiness {
    /// Materialize a record; the store assigns the id on insert.
    pub fn into_business(self) -> Business {
        Business {
            id: String::new(),
            name: self.name,
            business_type: self.business_type,
            description: self.description,
            start_date: self.start_date,
            funding_amount: self.funding_amount,
            status: self.status,
            beneficiary_id: self.beneficiary_id,
            county: self.county,
            employees: self.employees,
            monthly_revenue: self.monthly_revenue,
        }
    }
}
