//! Dashboard views derived from the user and business collections.
//!
//! Every view is recomputed from the records passed in; none of them
//! keeps state between calls.

use std::collections::HashSet;

use heva_core::models::business::{Business, BusinessStatus};
use heva_core::models::user::{BeneficiaryProfile, Role, User, UserStatus};
use serde::Serialize;

use crate::aggregate::{GroupCount, GroupCounts, average, group_count, percentage, top_n};
use crate::income::{IncomeDistribution, income_distribution};

/// Counties shown individually by [`county_chart`].
pub const COUNTY_CHART_LIMIT: usize = 8;

/// Counties listed in the top-county tables.
pub const TOP_COUNTIES: usize = 10;

/// Groups named as focus groups in [`BeneficiaryAnalytics`].
pub const FOCUS_GROUPS: usize = 3;

/// Label for beneficiaries with no recorded gender.
pub const GENDER_NOT_SPECIFIED: &str = "Not specified";

fn beneficiaries(users: &[User]) -> Vec<&User> {
    users.iter().filter(|u| u.role() == Role::Beneficiary).collect()
}

fn county_of(user: &User) -> Option<&str> {
    user.county.as_deref()
}

fn group_of(user: &User) -> Option<&str> {
    user.as_beneficiary().map(|b| b.vulnerable_group.label())
}

fn status_count<'a>(businesses: impl IntoIterator<Item = &'a Business>, status: BusinessStatus) -> usize {
    businesses.into_iter().filter(|b| b.status == status).count()
}

/// Top counties with the remainder folded into `Others`.
pub fn county_chart<'a, I>(users: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a User>,
{
    let counts = group_count(users, county_of);
    top_n(&counts, COUNTY_CHART_LIMIT, true)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_users: usize,
    pub pending_users: usize,
    pub approved_users: usize,
    /// Approved users as a rounded percentage of all users.
    pub approval_rate: u32,
    pub officers: usize,
    /// Beneficiaries whose `registeredBy` names an existing officer.
    pub registrations: usize,
    pub active_businesses: usize,
    pub total_businesses: usize,
    pub top_counties: Vec<GroupCount>,
    pub vulnerable_groups: GroupCounts,
    pub business_status: GroupCounts,
}

impl AdminOverview {
    pub fn compute(users: &[User], businesses: &[Business]) -> Self {
        let beneficiaries = beneficiaries(users);
        let officer_ids: HashSet<&str> = users
            .iter()
            .filter(|u| u.role() == Role::Officer)
            .map(|u| u.id.as_str())
            .collect();

        let approved_users = users.iter().filter(|u| u.status == UserStatus::Approved).count();
        let registrations = beneficiaries
            .iter()
            .filter_map(|u| u.as_beneficiary()?.registered_by.as_deref())
            .filter(|id| officer_ids.contains(id))
            .count();

        Self {
            total_users: users.len(),
            pending_users: users.iter().filter(|u| u.status == UserStatus::Pending).count(),
            approved_users,
            approval_rate: percentage(approved_users, users.len()),
            officers: officer_ids.len(),
            registrations,
            active_businesses: status_count(businesses, BusinessStatus::Active),
            total_businesses: businesses.len(),
            top_counties: top_n(
                &group_count(beneficiaries.iter().copied(), county_of),
                TOP_COUNTIES,
                false,
            ),
            vulnerable_groups: group_count(beneficiaries.iter().copied(), group_of),
            business_status: group_count(businesses, |b: &Business| Some(b.status.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// Officer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerOverview {
    pub officer_id: String,
    pub registrations: usize,
    pub verified: usize,
    pub pending: usize,
    pub verified_rate: u32,
    pub businesses: usize,
    pub active_businesses: usize,
    pub planning_businesses: usize,
    pub total_funding: f64,
    pub total_employees: u64,
    pub counties: GroupCounts,
    pub vulnerable_groups: GroupCounts,
}

impl OfficerOverview {
    /// View over the beneficiaries `officer_id` registered, found by a
    /// fresh scan of `users`.
    pub fn compute(officer_id: &str, users: &[User], businesses: &[Business]) -> Self {
        let mine: Vec<&User> = users.iter().filter(|u| u.is_registered_by(officer_id)).collect();
        let mine_ids: HashSet<&str> = mine.iter().map(|u| u.id.as_str()).collect();
        let my_businesses: Vec<&Business> = businesses
            .iter()
            .filter(|b| mine_ids.contains(b.beneficiary_id.as_str()))
            .collect();

        let verified = mine.iter().filter(|u| u.status == UserStatus::Approved).count();

        Self {
            officer_id: officer_id.to_string(),
            registrations: mine.len(),
            verified,
            pending: mine.iter().filter(|u| u.status == UserStatus::Pending).count(),
            verified_rate: percentage(verified, mine.len()),
            businesses: my_businesses.len(),
            active_businesses: status_count(my_businesses.iter().copied(), BusinessStatus::Active),
            planning_businesses: status_count(my_businesses.iter().copied(), BusinessStatus::Planning),
            total_funding: my_businesses.iter().map(|b| b.funding_amount).sum(),
            total_employees: my_businesses.iter().map(|b| u64::from(b.employees)).sum(),
            counties: group_count(mine.iter().copied(), county_of),
            vulnerable_groups: group_count(mine.iter().copied(), group_of),
        }
    }
}

// ---------------------------------------------------------------------------
// Beneficiary analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupShare {
    pub name: String,
    pub value: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    pub has_disability: usize,
    pub has_internet: usize,
    pub has_smartphone: usize,
    pub disability_rate: u32,
    pub internet_rate: u32,
    pub smartphone_rate: u32,
    /// Share of beneficiaries without internet access.
    pub lacking_internet_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryAnalytics {
    pub total: usize,
    /// Mean monthly income rounded to whole KSh. Unrecorded incomes
    /// count as zero.
    pub average_income: i64,
    pub counties_covered: usize,
    pub groups_represented: usize,
    pub groups: Vec<GroupShare>,
    pub top_counties: Vec<GroupCount>,
    pub income: IncomeDistribution,
    pub genders: GroupCounts,
    pub accessibility: Accessibility,
    pub focus_groups: Vec<String>,
}

impl BeneficiaryAnalytics {
    /// Analytics over the beneficiaries in `users`; other roles are skipped.
    pub fn compute(users: &[User]) -> Self {
        let profiles: Vec<(&User, &BeneficiaryProfile)> = users
            .iter()
            .filter_map(|u| u.as_beneficiary().map(|b| (u, b)))
            .collect();
        let total = profiles.len();

        let counties = group_count(profiles.iter().map(|(u, _)| *u), county_of);
        let groups = group_count(profiles.iter().map(|(u, _)| *u), group_of);

        let with = |pred: fn(&BeneficiaryProfile) -> bool| {
            profiles.iter().filter(|(_, b)| pred(b)).count()
        };
        let has_disability = with(|b| b.has_disability);
        let has_internet = with(|b| b.has_internet_access);
        let has_smartphone = with(|b| b.has_smartphone);

        let genders: Vec<String> = profiles
            .iter()
            .map(|(_, b)| {
                b.gender
                    .as_deref()
                    .filter(|g| !g.trim().is_empty())
                    .map_or_else(|| GENDER_NOT_SPECIFIED.to_string(), capitalize)
            })
            .collect();

        Self {
            total,
            average_income: average(profiles.iter().map(|(_, b)| *b), |b: &BeneficiaryProfile| {
                b.monthly_income
            })
            .round() as i64,
            counties_covered: counties.len(),
            groups_represented: groups.len(),
            groups: groups
                .iter()
                .map(|entry| GroupShare {
                    name: entry.name.clone(),
                    value: entry.count,
                    percentage: percentage(entry.count, total),
                })
                .collect(),
            top_counties: top_n(&counties, TOP_COUNTIES, false),
            income: income_distribution(profiles.iter().map(|(_, b)| *b), |b: &BeneficiaryProfile| {
                b.monthly_income
            }),
            genders: group_count(&genders, |g: &String| Some(g.as_str())),
            accessibility: Accessibility {
                has_disability,
                has_internet,
                has_smartphone,
                disability_rate: percentage(has_disability, total),
                internet_rate: percentage(has_internet, total),
                smartphone_rate: percentage(has_smartphone, total),
                lacking_internet_rate: percentage(total - has_internet, total),
            },
            focus_groups: top_n(&groups, FOCUS_GROUPS, false)
                .into_iter()
                .map(|entry| entry.name)
                .collect(),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
