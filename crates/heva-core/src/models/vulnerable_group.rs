//! Vulnerable-group categories used to target interventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HevaError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VulnerableGroup {
    #[serde(rename = "Poverty & Low Financial Literacy")]
    PovertyAndLowFinancialLiteracy,
    #[serde(rename = "Refugees & Displaced Persons")]
    RefugeesAndDisplacedPersons,
    #[serde(rename = "LGBTQ+ Community")]
    LgbtqCommunity,
    #[serde(rename = "Persons with Disabilities")]
    PersonsWithDisabilities,
    #[serde(rename = "Creative Artists")]
    CreativeArtists,
    #[serde(rename = "Device & Internet Access Issues")]
    DeviceAndInternetAccessIssues,
    #[serde(rename = "Diverse Business Models")]
    DiverseBusinessModels,
}

impl VulnerableGroup {
    pub const ALL: [VulnerableGroup; 7] = [
        VulnerableGroup::PovertyAndLowFinancialLiteracy,
        VulnerableGroup::RefugeesAndDisplacedPersons,
        VulnerableGroup::LgbtqCommunity,
        VulnerableGroup::PersonsWithDisabilities,
        VulnerableGroup::CreativeArtists,
        VulnerableGroup::DeviceAndInternetAccessIssues,
        VulnerableGroup::DiverseBusinessModels,
    ];

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            VulnerableGroup::PovertyAndLowFinancialLiteracy => "Poverty & Low Financial Literacy",
            VulnerableGroup::RefugeesAndDisplacedPersons => "Refugees & Displaced Persons",
            VulnerableGroup::LgbtqCommunity => "LGBTQ+ Community",
            VulnerableGroup::PersonsWithDisabilities => "Persons with Disabilities",
            VulnerableGroup::CreativeArtists => "Creative Artists",
            VulnerableGroup::DeviceAndInternetAccessIssues => "Device & Internet Access Issues",
            VulnerableGroup::DiverseBusinessModels => "Diverse Business Models",
        }
    }
}

impl fmt::Display for VulnerableGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VulnerableGroup {
    type Err = HevaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.label() == s)
            .ok_or_else(|| HevaError::validation(format!("unknown vulnerable group: {s}")))
    }
}
