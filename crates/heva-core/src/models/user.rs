//! User domain model.
//!
//! A user is one of three roles. Role-specific fields live in
//! [`Profile`] and are only reachable after matching on it, so a
//! beneficiary without a vulnerable group cannot be represented.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::vulnerable_group::VulnerableGroup;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "data_entry_officer")]
    Officer,
    #[serde(rename = "beneficiary")]
    Beneficiary,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Officer => "data_entry_officer",
            Role::Beneficiary => "beneficiary",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminProfile {
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfficerProfile {
    pub employee_id: String,
    /// Counties this officer may register beneficiaries in.
    #[serde(default)]
    pub assigned_counties: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryProfile {
    pub vulnerable_group: VulnerableGroup,
    /// Monthly income in KSh. Zero means "not recorded".
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub number_of_children: u32,
    #[serde(default)]
    pub employment_status: String,
    #[serde(default)]
    pub education_level: String,
    #[serde(default)]
    pub has_disability: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability_type: Option<String>,
    #[serde(default)]
    pub has_internet_access: bool,
    #[serde(default)]
    pub has_smartphone: bool,
    #[serde(default)]
    pub primary_language: String,
    /// Document labels only; file contents are never stored.
    #[serde(default)]
    pub documents: Vec<String>,
    /// Id of the officer who registered this beneficiary, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl BeneficiaryProfile {
    /// A profile with only the vulnerable group set.
    pub fn new(vulnerable_group: VulnerableGroup) -> Self {
        Self {
            vulnerable_group,
            monthly_income: 0.0,
            number_of_children: 0,
            employment_status: String::new(),
            education_level: String::new(),
            has_disability: false,
            disability_type: None,
            has_internet_access: false,
            has_smartphone: false,
            primary_language: String::new(),
            documents: Vec::new(),
            registered_by: None,
            id_number: None,
            date_of_birth: None,
            gender: None,
            emergency_contact: None,
            emergency_phone: None,
            additional_notes: None,
        }
    }
}

/// Role-specific part of a [`User`], tagged by `role` when serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Profile {
    #[serde(rename = "admin")]
    Admin(AdminProfile),
    #[serde(rename = "data_entry_officer")]
    Officer(OfficerProfile),
    #[serde(rename = "beneficiary")]
    Beneficiary(BeneficiaryProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Admin(_) => Role::Admin,
            Profile::Officer(_) => Role::Officer,
            Profile::Beneficiary(_) => Role::Beneficiary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque id, unique within the store. Empty until inserted.
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_approved(&self) -> bool {
        self.status == UserStatus::Approved
    }

    pub fn as_beneficiary(&self) -> Option<&BeneficiaryProfile> {
        match &self.profile {
            Profile::Beneficiary(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_beneficiary_mut(&mut self) -> Option<&mut BeneficiaryProfile> {
        match &mut self.profile {
            Profile::Beneficiary(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_officer(&self) -> Option<&OfficerProfile> {
        match &self.profile {
            Profile::Officer(profile) => Some(profile),
            _ => None,
        }
    }

    /// True when this user is a beneficiary registered by `officer_id`.
    pub fn is_registered_by(&self, officer_id: &str) -> bool {
        self.as_beneficiary()
            .and_then(|b| b.registered_by.as_deref())
            .is_some_and(|id| id == officer_id)
    }
}

/// Fields supplied when registering a new user. Status, id and
/// creation time are assigned by the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub county: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}
