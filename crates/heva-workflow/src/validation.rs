//! Field checks applied before any record reaches the store.
//!
//! All checks are local to one record. Uniqueness across records is
//! checked by the service, which can see the store.

use heva_core::error::{HevaError, HevaResult};
use heva_core::models::business::Business;
use heva_core::models::county::is_known_county;
use heva_core::models::user::{BeneficiaryProfile, NewUser, OfficerProfile, Profile, User};

fn require(value: &str, field: &str) -> HevaResult<()> {
    if value.trim().is_empty() {
        return Err(HevaError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn non_negative(value: f64, field: &str) -> HevaResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(HevaError::validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}

fn known_county(county: &str) -> HevaResult<()> {
    if !is_known_county(county) {
        return Err(HevaError::validation(format!("unknown county: {county}")));
    }
    Ok(())
}

fn optional_county(county: Option<&str>) -> HevaResult<()> {
    match county {
        Some(county) if !county.trim().is_empty() => known_county(county),
        _ => Ok(()),
    }
}

fn check_identity(
    email: &str,
    first_name: &str,
    last_name: &str,
    county: Option<&str>,
) -> HevaResult<()> {
    require(email, "email")?;
    require(first_name, "firstName")?;
    require(last_name, "lastName")?;
    optional_county(county)
}

fn check_officer(profile: &OfficerProfile) -> HevaResult<()> {
    require(&profile.employee_id, "employeeId")?;
    if profile.assigned_counties.is_empty() {
        return Err(HevaError::validation(
            "an officer needs at least one assigned county",
        ));
    }
    profile
        .assigned_counties
        .iter()
        .try_for_each(|county| known_county(county))
}

pub fn check_beneficiary(profile: &BeneficiaryProfile) -> HevaResult<()> {
    non_negative(profile.monthly_income, "monthlyIncome")
}

fn check_profile(profile: &Profile) -> HevaResult<()> {
    match profile {
        Profile::Admin(_) => Ok(()),
        Profile::Officer(officer) => check_officer(officer),
        Profile::Beneficiary(beneficiary) => check_beneficiary(beneficiary),
    }
}

/// Checks for a registration. Admin accounts cannot be registered.
pub fn check_registration(input: &NewUser) -> HevaResult<()> {
    check_identity(
        &input.email,
        &input.first_name,
        &input.last_name,
        input.county.as_deref(),
    )?;
    if matches!(input.profile, Profile::Admin(_)) {
        return Err(HevaError::validation(
            "role must be data_entry_officer or beneficiary",
        ));
    }
    check_profile(&input.profile)
}

/// Checks for an edited user record of any role.
pub fn check_user(user: &User) -> HevaResult<()> {
    check_identity(
        &user.email,
        &user.first_name,
        &user.last_name,
        user.county.as_deref(),
    )?;
    check_profile(&user.profile)
}

pub fn check_business(business: &Business) -> HevaResult<()> {
    require(&business.name, "name")?;
    require(&business.business_type, "type")?;
    require(&business.beneficiary_id, "beneficiaryId")?;
    known_county(&business.county)?;
    non_negative(business.funding_amount, "fundingAmount")?;
    if let Some(revenue) = business.monthly_revenue {
        non_negative(revenue, "monthlyRevenue")?;
    }
    Ok(())
}
