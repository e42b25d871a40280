//! Beneficiary search criteria.

use heva_core::models::user::{User, UserStatus};
use heva_core::models::vulnerable_group::VulnerableGroup;
use serde::Deserialize;

/// Criteria for [`WorkflowService::search_beneficiaries`]. Unset
/// criteria match everything.
///
/// [`WorkflowService::search_beneficiaries`]: crate::WorkflowService::search_beneficiaries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeneficiaryFilter {
    /// Case-insensitive match on full name or email; plain substring
    /// match on phone number.
    pub query: Option<String>,
    pub group: Option<VulnerableGroup>,
    pub county: Option<String>,
    pub status: Option<UserStatus>,
}

impl BeneficiaryFilter {
    pub fn matches(&self, user: &User) -> bool {
        let Some(profile) = user.as_beneficiary() else {
            return false;
        };

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let hit = user.full_name().to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
                || user
                    .phone_number
                    .as_deref()
                    .is_some_and(|phone| phone.contains(query));
            if !hit {
                return false;
            }
        }

        self.group.is_none_or(|group| profile.vulnerable_group == group)
            && self
                .county
                .as_deref()
                .is_none_or(|county| user.county.as_deref() == Some(county))
            && self.status.is_none_or(|status| user.status == status)
    }
}
