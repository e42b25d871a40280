//! Workflow service: registration, approval, edits and role-scoped
//! queries over users and businesses.

use std::collections::HashSet;

use chrono::Utc;
use heva_core::error::{HevaError, HevaResult};
use heva_core::models::business::{Business, BusinessStatus, NewBusiness};
use heva_core::models::user::{NewUser, Profile, Role, User, UserStatus};
use heva_core::repository::{BusinessRepository, SessionRepository, UserRepository};
use tracing::{info, warn};

use crate::filter::BeneficiaryFilter;
use crate::transition::{Decision, decide};
use crate::validation;

fn employee_id(profile: &Profile) -> Option<&str> {
    match profile {
        Profile::Officer(officer) => Some(officer.employee_id.as_str()),
        _ => None,
    }
}

/// Turn a registration into a pending record. The store assigns the id.
fn pending_user(input: NewUser) -> User {
    User {
        id: String::new(),
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        status: UserStatus::Pending,
        created_at: Utc::now(),
        phone_number: input.phone_number,
        county: input.county,
        profile: input.profile,
    }
}

fn deny(actor: &User, action: &str) -> HevaError {
    warn!(actor_id = %actor.id, role = %actor.role(), action, "Operation denied");
    HevaError::denied(format!("{} may not {action}", actor.role()))
}

fn require_admin(actor: &User, action: &str) -> HevaResult<()> {
    if actor.role() == Role::Admin {
        Ok(())
    } else {
        Err(deny(actor, action))
    }
}

/// Admins edit anyone; officers edit themselves and the beneficiaries
/// they registered; beneficiaries edit only themselves.
fn may_edit_user(actor: &User, target: &User) -> bool {
    match actor.role() {
        Role::Admin => true,
        Role::Officer => target.id == actor.id || target.is_registered_by(&actor.id),
        Role::Beneficiary => target.id == actor.id,
    }
}

/// Admins, the owning beneficiary, and the officer who registered the
/// owner may manage a business.
fn may_manage_business(actor: &User, owner: &User) -> bool {
    match actor.role() {
        Role::Admin => true,
        Role::Officer => owner.is_registered_by(&actor.id),
        Role::Beneficiary => owner.id == actor.id,
    }
}

/// Workflow service.
///
/// Generic over repository implementations. Every query reads the
/// repositories afresh, so results reflect all prior mutations.
pub struct WorkflowService<U: UserRepository, B: BusinessRepository, S: SessionRepository> {
    user_repo: U,
    business_repo: B,
    session_repo: S,
}

impl<U: UserRepository, B: BusinessRepository, S: SessionRepository> WorkflowService<U, B, S> {
    pub fn new(user_repo: U, business_repo: B, session_repo: S) -> Self {
        Self {
            user_repo,
            business_repo,
            session_repo,
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Self-registration. The account starts `pending` whatever the
    /// requested role; a beneficiary cannot claim a registering officer.
    pub async fn register(&self, mut input: NewUser) -> HevaResult<User> {
        validation::check_registration(&input)?;
        if let Profile::Beneficiary(profile) = &mut input.profile {
            profile.registered_by = None;
        }
        self.ensure_unique(&input.email, employee_id(&input.profile), None)
            .await?;

        let user = self.user_repo.insert(pending_user(input)).await?;
        info!(user_id = %user.id, role = %user.role(), "User registered");
        Ok(user)
    }

    /// Register a beneficiary on someone's behalf.
    ///
    /// Officers may only register into their assigned counties and are
    /// recorded as the registering officer. Admins may name any existing
    /// officer, or none. At least one document label is required.
    pub async fn register_beneficiary(&self, actor: &User, mut input: NewUser) -> HevaResult<User> {
        if !matches!(actor.role(), Role::Admin | Role::Officer) {
            return Err(deny(actor, "register beneficiaries"));
        }
        validation::check_registration(&input)?;

        let Profile::Beneficiary(profile) = &mut input.profile else {
            return Err(HevaError::validation(
                "only beneficiaries can be registered on someone's behalf",
            ));
        };
        if profile.documents.iter().all(|d| d.trim().is_empty()) {
            return Err(HevaError::validation("at least one document is required"));
        }

        if let Some(officer) = actor.as_officer() {
            let in_scope = input
                .county
                .as_deref()
                .is_some_and(|county| officer.assigned_counties.contains(county));
            if !in_scope {
                return Err(deny(actor, "register outside assigned counties"));
            }
            profile.registered_by = Some(actor.id.clone());
        } else if let Some(officer_id) = profile.registered_by.as_deref() {
            self.ensure_officer(officer_id).await?;
        }

        self.ensure_unique(&input.email, None, None).await?;

        let user = self.user_repo.insert(pending_user(input)).await?;
        info!(
            user_id = %user.id,
            actor_id = %actor.id,
            "Beneficiary registered"
        );
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Status decisions
    // -----------------------------------------------------------------------

    pub async fn approve_user(&self, actor: &User, id: &str) -> HevaResult<User> {
        self.decide_user(actor, id, Decision::Approve).await
    }

    pub async fn reject_user(&self, actor: &User, id: &str) -> HevaResult<User> {
        self.decide_user(actor, id, Decision::Reject).await
    }

    async fn decide_user(&self, actor: &User, id: &str, decision: Decision) -> HevaResult<User> {
        require_admin(actor, "decide on accounts")?;

        let mut user = self.user_repo.get_by_id(id).await?;
        user.status = decide(user.status, decision).inspect_err(|e| {
            warn!(user_id = %id, error = %e, "Status change refused");
        })?;

        let user = self.user_repo.replace(user).await?;
        info!(
            user_id = %user.id,
            actor_id = %actor.id,
            status = %user.status,
            "User status decided"
        );
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Edits and deletion
    // -----------------------------------------------------------------------

    /// Replace a user's editable fields.
    ///
    /// Role, status and creation time are fixed here. Only admins may
    /// move a beneficiary to another officer or change an officer's
    /// employee id and county assignment. An officer may only move a
    /// beneficiary into one of their assigned counties.
    pub async fn update_user(&self, actor: &User, user: User) -> HevaResult<User> {
        let existing = self.user_repo.get_by_id(&user.id).await?;
        if !may_edit_user(actor, &existing) {
            return Err(deny(actor, "edit this user"));
        }

        if user.role() != existing.role() {
            return Err(HevaError::validation("role cannot be changed"));
        }
        if user.status != existing.status {
            return Err(HevaError::validation(
                "status changes go through approve or reject",
            ));
        }
        if user.created_at != existing.created_at {
            return Err(HevaError::validation("createdAt cannot be changed"));
        }

        let is_admin = actor.role() == Role::Admin;
        match (&user.profile, &existing.profile) {
            (Profile::Beneficiary(new), Profile::Beneficiary(old))
                if new.registered_by != old.registered_by =>
            {
                if !is_admin {
                    return Err(deny(actor, "reassign a beneficiary"));
                }
                if let Some(officer_id) = new.registered_by.as_deref() {
                    self.ensure_officer(officer_id).await?;
                }
            }
            (Profile::Officer(new), Profile::Officer(old)) if new != old && !is_admin => {
                return Err(deny(actor, "change officer assignments"));
            }
            _ => {}
        }

        if let Some(officer) = actor.as_officer() {
            let moved = existing.id != actor.id && user.county != existing.county;
            let in_scope = user
                .county
                .as_deref()
                .is_some_and(|county| officer.assigned_counties.contains(county));
            if moved && !in_scope {
                return Err(deny(actor, "move a beneficiary outside assigned counties"));
            }
        }

        validation::check_user(&user)?;
        self.ensure_unique(&user.email, employee_id(&user.profile), Some(&user.id))
            .await?;

        let user = self.user_repo.replace(user).await?;
        info!(user_id = %user.id, actor_id = %actor.id, "User updated");
        Ok(user)
    }

    /// Remove a user and end their sessions.
    ///
    /// Businesses they own and beneficiaries they registered are left in
    /// place; [`orphaned_businesses`](Self::orphaned_businesses) reports
    /// the former.
    pub async fn delete_user(&self, actor: &User, id: &str) -> HevaResult<User> {
        require_admin(actor, "delete users")?;

        let user = self.user_repo.get_by_id(id).await?;
        self.user_repo.remove_by_id(id).await?;
        let sessions = self.session_repo.invalidate_user_sessions(id).await?;

        let orphaned = self
            .business_repo
            .list()
            .await?
            .iter()
            .filter(|b| b.beneficiary_id == id)
            .count();

        info!(
            user_id = %id,
            actor_id = %actor.id,
            role = %user.role(),
            sessions,
            orphaned_businesses = orphaned,
            "User deleted"
        );
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Businesses
    // -----------------------------------------------------------------------

    pub async fn add_business(&self, actor: &User, input: NewBusiness) -> HevaResult<Business> {
        let business = input.into_business();
        validation::check_business(&business)?;
        self.authorize_new_owner(actor, &business.beneficiary_id)
            .await?;

        let business = self.business_repo.insert(business).await?;
        info!(
            business_id = %business.id,
            beneficiary_id = %business.beneficiary_id,
            actor_id = %actor.id,
            "Business added"
        );
        Ok(business)
    }

    pub async fn update_business(&self, actor: &User, business: Business) -> HevaResult<Business> {
        let existing = self.business_repo.get_by_id(&business.id).await?;
        self.authorize_existing_owner(actor, &existing.beneficiary_id)
            .await?;
        validation::check_business(&business)?;
        if business.beneficiary_id != existing.beneficiary_id {
            self.authorize_new_owner(actor, &business.beneficiary_id)
                .await?;
        }

        let business = self.business_repo.replace(business).await?;
        info!(business_id = %business.id, actor_id = %actor.id, "Business updated");
        Ok(business)
    }

    /// Assign a business status directly. Any of the four states may
    /// follow any other.
    pub async fn set_business_status(
        &self,
        actor: &User,
        id: &str,
        status: BusinessStatus,
    ) -> HevaResult<Business> {
        let mut business = self.business_repo.get_by_id(id).await?;
        self.authorize_existing_owner(actor, &business.beneficiary_id)
            .await?;

        let from = business.status;
        business.status = status;
        let business = self.business_repo.replace(business).await?;
        info!(
            business_id = %business.id,
            actor_id = %actor.id,
            %from,
            to = %status,
            "Business status set"
        );
        Ok(business)
    }

    /// The owner must exist, be a beneficiary and be manageable by
    /// `actor`.
    async fn authorize_new_owner(&self, actor: &User, beneficiary_id: &str) -> HevaResult<()> {
        let owner = self.user_repo.get_by_id(beneficiary_id).await?;
        if owner.role() != Role::Beneficiary {
            return Err(HevaError::validation(
                "a business must belong to a beneficiary",
            ));
        }
        if !may_manage_business(actor, &owner) {
            return Err(deny(actor, "manage this business"));
        }
        Ok(())
    }

    /// Like [`authorize_new_owner`](Self::authorize_new_owner), but an
    /// owner that no longer exists leaves the business to admins.
    async fn authorize_existing_owner(&self, actor: &User, beneficiary_id: &str) -> HevaResult<()> {
        if actor.role() == Role::Admin {
            return Ok(());
        }
        match self.user_repo.get_by_id(beneficiary_id).await {
            Ok(owner) if may_manage_business(actor, &owner) => Ok(()),
            Ok(_) | Err(HevaError::NotFound { .. }) => Err(deny(actor, "manage this business")),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub async fn list_users(&self) -> HevaResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn list_businesses(&self) -> HevaResult<Vec<Business>> {
        self.business_repo.list().await
    }

    /// Beneficiaries whose `registeredBy` is `officer_id`, read live.
    pub async fn beneficiaries_for_officer(&self, officer_id: &str) -> HevaResult<Vec<User>> {
        let users = self.user_repo.list().await?;
        Ok(users
            .into_iter()
            .filter(|u| u.is_registered_by(officer_id))
            .collect())
    }

    pub async fn registered_count(&self, officer_id: &str) -> HevaResult<usize> {
        Ok(self.beneficiaries_for_officer(officer_id).await?.len())
    }

    pub async fn businesses_for_county(&self, county: &str) -> HevaResult<Vec<Business>> {
        let businesses = self.business_repo.list().await?;
        Ok(businesses
            .into_iter()
            .filter(|b| b.county == county)
            .collect())
    }

    /// Businesses owned by the beneficiaries `officer_id` registered.
    pub async fn businesses_for_officer(&self, officer_id: &str) -> HevaResult<Vec<Business>> {
        let mine: HashSet<String> = self
            .beneficiaries_for_officer(officer_id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let businesses = self.business_repo.list().await?;
        Ok(businesses
            .into_iter()
            .filter(|b| mine.contains(&b.beneficiary_id))
            .collect())
    }

    /// Users `actor` is allowed to see.
    pub async fn visible_users(&self, actor: &User) -> HevaResult<Vec<User>> {
        let users = self.user_repo.list().await?;
        Ok(match actor.role() {
            Role::Admin => users,
            Role::Officer => users
                .into_iter()
                .filter(|u| u.id == actor.id || u.is_registered_by(&actor.id))
                .collect(),
            Role::Beneficiary => users.into_iter().filter(|u| u.id == actor.id).collect(),
        })
    }

    /// Businesses `actor` is allowed to see.
    pub async fn visible_businesses(&self, actor: &User) -> HevaResult<Vec<Business>> {
        match actor.role() {
            Role::Admin => self.business_repo.list().await,
            Role::Officer => self.businesses_for_officer(&actor.id).await,
            Role::Beneficiary => {
                let businesses = self.business_repo.list().await?;
                Ok(businesses
                    .into_iter()
                    .filter(|b| b.beneficiary_id == actor.id)
                    .collect())
            }
        }
    }

    /// Visible beneficiaries matching `filter`, in store order.
    pub async fn search_beneficiaries(
        &self,
        actor: &User,
        filter: &BeneficiaryFilter,
    ) -> HevaResult<Vec<User>> {
        let users = self.visible_users(actor).await?;
        Ok(users.into_iter().filter(|u| filter.matches(u)).collect())
    }

    /// Businesses whose owner is missing or is not a beneficiary.
    pub async fn orphaned_businesses(&self) -> HevaResult<Vec<Business>> {
        let owners: HashSet<String> = self
            .user_repo
            .list()
            .await?
            .into_iter()
            .filter(|u| u.role() == Role::Beneficiary)
            .map(|u| u.id)
            .collect();
        let businesses = self.business_repo.list().await?;
        Ok(businesses
            .into_iter()
            .filter(|b| !owners.contains(&b.beneficiary_id))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn ensure_officer(&self, id: &str) -> HevaResult<()> {
        let officer = self.user_repo.get_by_id(id).await?;
        if officer.role() != Role::Officer {
            return Err(HevaError::validation(format!(
                "registeredBy must name an officer, {id} is a {}",
                officer.role()
            )));
        }
        Ok(())
    }

    /// Email (case-insensitive) and officer employee id are unique among
    /// all users other than `except_id`.
    async fn ensure_unique(
        &self,
        email: &str,
        employee_id: Option<&str>,
        except_id: Option<&str>,
    ) -> HevaResult<()> {
        let users = self.user_repo.list().await?;
        for other in users.iter().filter(|u| Some(u.id.as_str()) != except_id) {
            if other.email.eq_ignore_ascii_case(email) {
                return Err(HevaError::AlreadyExists {
                    entity: format!("user with email {email}"),
                });
            }
            let taken = other.as_officer().map(|o| o.employee_id.as_str());
            if employee_id.is_some() && taken == employee_id {
                return Err(HevaError::AlreadyExists {
                    entity: format!(
                        "officer with employee id {}",
                        employee_id.unwrap_or_default()
                    ),
                });
            }
        }
        Ok(())
    }
}
