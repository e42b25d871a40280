//! Integration tests for the workflow service over the in-memory store.

use chrono::{Duration, NaiveDate, Utc};
use heva_core::error::HevaError;
use heva_core::models::business::{BusinessStatus, NewBusiness};
use heva_core::models::session::CreateSession;
use heva_core::models::user::{
    AdminProfile, BeneficiaryProfile, NewUser, OfficerProfile, Profile, User, UserStatus,
};
use heva_core::models::vulnerable_group::VulnerableGroup;
use heva_core::repository::{SessionRepository, UserRepository};
use heva_store::MemoryStore;
use heva_store::repository::{MemBusinessRepository, MemSessionRepository, MemUserRepository};
use heva_workflow::{BeneficiaryFilter, WorkflowService};

type Service = WorkflowService<MemUserRepository, MemBusinessRepository, MemSessionRepository>;

struct Fixture {
    service: Service,
    users: MemUserRepository,
    sessions: MemSessionRepository,
    admin: User,
    officer: User,
}

fn base_user(id: &str, email: &str, county: &str, profile: Profile) -> User {
    User {
        id: id.into(),
        email: email.into(),
        first_name: id.into(),
        last_name: "Test".into(),
        status: UserStatus::Approved,
        created_at: Utc::now(),
        phone_number: None,
        county: Some(county.into()),
        profile,
    }
}

fn officer_profile(employee_id: &str, counties: &[&str]) -> Profile {
    Profile::Officer(OfficerProfile {
        employee_id: employee_id.into(),
        assigned_counties: counties.iter().map(|c| c.to_string()).collect(),
    })
}

fn beneficiary_profile(income: f64, registered_by: Option<&str>) -> BeneficiaryProfile {
    let mut profile = BeneficiaryProfile::new(VulnerableGroup::CreativeArtists);
    profile.monthly_income = income;
    profile.registered_by = registered_by.map(str::to_string);
    profile
}

fn new_beneficiary(email: &str, county: &str) -> NewUser {
    let mut profile = beneficiary_profile(12_000.0, None);
    profile.documents = vec!["National ID".into()];
    NewUser {
        email: email.into(),
        first_name: "Amina".into(),
        last_name: "Otieno".into(),
        phone_number: Some("+254700000001".into()),
        county: Some(county.into()),
        profile: Profile::Beneficiary(profile),
    }
}

fn new_business(owner: &str) -> NewBusiness {
    NewBusiness {
        name: "Beadwork Studio".into(),
        business_type: "Crafts".into(),
        description: String::new(),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        funding_amount: 30_000.0,
        status: BusinessStatus::Planning,
        beneficiary_id: owner.into(),
        county: "Nairobi".into(),
        employees: 1,
        monthly_revenue: None,
    }
}

/// One admin `A1` and one officer `O1` assigned to Nairobi.
async fn setup() -> Fixture {
    let store = MemoryStore::new();
    let users = MemUserRepository::new(store.clone());
    let sessions = MemSessionRepository::new(store.clone());

    let admin = users
        .insert(base_user(
            "A1",
            "admin@heva.org",
            "Nairobi",
            Profile::Admin(AdminProfile::default()),
        ))
        .await
        .unwrap();
    let officer = users
        .insert(base_user(
            "O1",
            "officer1@heva.org",
            "Nairobi",
            officer_profile("EMP001", &["Nairobi"]),
        ))
        .await
        .unwrap();

    let service = WorkflowService::new(
        users.clone(),
        MemBusinessRepository::new(store.clone()),
        sessions.clone(),
    );

    Fixture {
        service,
        users,
        sessions,
        admin,
        officer,
    }
}

async fn seed_beneficiary(f: &Fixture, id: &str, county: &str, registered_by: Option<&str>) -> User {
    f.users
        .insert(base_user(
            id,
            &format!("{id}@example.com"),
            county,
            Profile::Beneficiary(beneficiary_profile(0.0, registered_by)),
        ))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_creates_pending_account() {
    let f = setup().await;

    let user = f
        .service
        .register(new_beneficiary("amina@example.com", "Kisumu"))
        .await
        .unwrap();
    assert_eq!(user.status, UserStatus::Pending);
    assert!(!user.id.is_empty());

    let officer = f
        .service
        .register(NewUser {
            email: "officer2@heva.org".into(),
            profile: officer_profile("EMP002", &["Kisumu"]),
            ..new_beneficiary("unused@example.com", "Kisumu")
        })
        .await
        .unwrap();
    assert_eq!(officer.status, UserStatus::Pending);
}

#[tokio::test]
async fn register_drops_claimed_registering_officer() {
    let f = setup().await;
    let mut input = new_beneficiary("amina@example.com", "Nairobi");
    if let Profile::Beneficiary(p) = &mut input.profile {
        p.registered_by = Some("O1".into());
    }

    let user = f.service.register(input).await.unwrap();
    assert!(!user.is_registered_by("O1"));
}

#[tokio::test]
async fn register_rejects_admin_role_without_storing() {
    let f = setup().await;
    let before = f.service.list_users().await.unwrap().len();

    let err = f
        .service
        .register(NewUser {
            profile: Profile::Admin(AdminProfile::default()),
            ..new_beneficiary("root@example.com", "Nairobi")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));
    assert_eq!(f.service.list_users().await.unwrap().len(), before);
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_employee_id() {
    let f = setup().await;

    let err = f
        .service
        .register(new_beneficiary("OFFICER1@heva.org", "Nairobi"))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AlreadyExists { .. }));

    let err = f
        .service
        .register(NewUser {
            profile: officer_profile("EMP001", &["Kisumu"]),
            ..new_beneficiary("new.officer@heva.org", "Kisumu")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AlreadyExists { .. }));
}

#[tokio::test]
async fn officer_registration_is_scoped_to_assigned_counties() {
    let f = setup().await;

    let user = f
        .service
        .register_beneficiary(&f.officer, new_beneficiary("b@example.com", "Nairobi"))
        .await
        .unwrap();
    assert!(user.is_registered_by("O1"));
    assert_eq!(user.status, UserStatus::Pending);

    let err = f
        .service
        .register_beneficiary(&f.officer, new_beneficiary("c@example.com", "Mombasa"))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn officer_registration_requires_a_document() {
    let f = setup().await;
    let mut input = new_beneficiary("b@example.com", "Nairobi");
    if let Profile::Beneficiary(p) = &mut input.profile {
        p.documents.clear();
    }

    let err = f
        .service
        .register_beneficiary(&f.officer, input)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));
}

#[tokio::test]
async fn beneficiaries_cannot_register_others() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;

    let err = f
        .service
        .register_beneficiary(&b, new_beneficiary("x@example.com", "Nairobi"))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
}

// ---------------------------------------------------------------------------
// Status decisions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_approves_pending_user() {
    let f = setup().await;
    let user = f
        .service
        .register(new_beneficiary("amina@example.com", "Nairobi"))
        .await
        .unwrap();

    let approved = f.service.approve_user(&f.admin, &user.id).await.unwrap();
    assert_eq!(approved.status, UserStatus::Approved);
}

#[tokio::test]
async fn reject_then_approve_is_an_invalid_transition() {
    let f = setup().await;
    let user = f
        .service
        .register(new_beneficiary("amina@example.com", "Nairobi"))
        .await
        .unwrap();

    f.service.reject_user(&f.admin, &user.id).await.unwrap();
    let err = f
        .service
        .approve_user(&f.admin, &user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::InvalidTransition { .. }));

    let stored = f.users.get_by_id(&user.id).await.unwrap();
    assert_eq!(stored.status, UserStatus::Rejected);
}

#[tokio::test]
async fn decisions_on_missing_user_fail() {
    let f = setup().await;
    let err = f.service.approve_user(&f.admin, "nope").await.unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));
}

#[tokio::test]
async fn only_admins_decide() {
    let f = setup().await;
    let user = f
        .service
        .register(new_beneficiary("amina@example.com", "Nairobi"))
        .await
        .unwrap();

    let err = f
        .service
        .approve_user(&f.officer, &user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
}

// ---------------------------------------------------------------------------
// Edits and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn officer_edits_own_beneficiary_but_not_others() {
    let f = setup().await;
    let mine = seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    let other = seed_beneficiary(&f, "B2", "Nairobi", None).await;

    let edited = f
        .service
        .update_user(
            &f.officer,
            User {
                phone_number: Some("+254711111111".into()),
                ..mine
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.phone_number.as_deref(), Some("+254711111111"));

    let err = f
        .service
        .update_user(
            &f.officer,
            User {
                last_name: "Changed".into(),
                ..other
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn officer_cannot_move_beneficiary_outside_assigned_counties() {
    let f = setup().await;
    let mine = seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;

    let err = f
        .service
        .update_user(
            &f.officer,
            User {
                county: Some("Mombasa".into()),
                ..mine.clone()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
    let stored = f.users.get_by_id("B1").await.unwrap();
    assert_eq!(stored.county.as_deref(), Some("Nairobi"));

    let moved = f
        .service
        .update_user(
            &f.admin,
            User {
                county: Some("Mombasa".into()),
                ..mine
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.county.as_deref(), Some("Mombasa"));
}

#[tokio::test]
async fn update_missing_user_fails() {
    let f = setup().await;
    let ghost = base_user(
        "ghost",
        "ghost@example.com",
        "Nairobi",
        Profile::Beneficiary(beneficiary_profile(0.0, None)),
    );

    let err = f.service.update_user(&f.admin, ghost).await.unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));
    assert!(f.users.get_by_id("ghost").await.is_err());
}

#[tokio::test]
async fn update_cannot_change_status_or_role() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;

    let err = f
        .service
        .update_user(
            &f.admin,
            User {
                status: UserStatus::Rejected,
                ..b.clone()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));

    let err = f
        .service
        .update_user(
            &f.admin,
            User {
                profile: Profile::Admin(AdminProfile::default()),
                ..b
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));
}

#[tokio::test]
async fn only_admins_reassign_beneficiaries() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;

    let mut claimed = b.clone();
    if let Some(p) = claimed.as_beneficiary_mut() {
        p.registered_by = Some("O1".into());
    }

    let err = f
        .service
        .update_user(&b, claimed.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));

    f.service.update_user(&f.admin, claimed).await.unwrap();
    assert_eq!(f.service.registered_count("O1").await.unwrap(), 1);
}

#[tokio::test]
async fn delete_orphans_businesses_and_ends_sessions() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    let business = f
        .service
        .add_business(&f.officer, new_business(&b.id))
        .await
        .unwrap();
    let session = f
        .sessions
        .create(CreateSession {
            user_id: b.id.clone(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();

    f.service.delete_user(&f.admin, &b.id).await.unwrap();

    assert!(matches!(
        f.users.get_by_id(&b.id).await,
        Err(HevaError::NotFound { .. })
    ));
    assert!(f.sessions.get_by_id(session.id).await.is_err());

    let orphans = f.service.orphaned_businesses().await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, business.id);

    // Only admins may touch an orphaned business.
    let err = f
        .service
        .set_business_status(&f.officer, &business.id, BusinessStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
    f.service
        .set_business_status(&f.admin, &business.id, BusinessStatus::Failed)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_missing_user_fails() {
    let f = setup().await;
    let err = f.service.delete_user(&f.admin, "ghost").await.unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Businesses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn business_permissions_follow_ownership() {
    let f = setup().await;
    let mine = seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    let other = seed_beneficiary(&f, "B2", "Nairobi", None).await;

    f.service
        .add_business(&f.officer, new_business(&mine.id))
        .await
        .unwrap();
    f.service
        .add_business(&other, new_business(&other.id))
        .await
        .unwrap();

    let err = f
        .service
        .add_business(&f.officer, new_business(&other.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));

    let err = f
        .service
        .add_business(&mine, new_business(&other.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn business_must_reference_existing_beneficiary() {
    let f = setup().await;

    let err = f
        .service
        .add_business(&f.admin, new_business("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));

    let err = f
        .service
        .add_business(&f.admin, new_business("O1"))
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));
}

#[tokio::test]
async fn business_status_is_directly_settable() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;
    let business = f
        .service
        .add_business(&b, new_business(&b.id))
        .await
        .unwrap();

    for status in [
        BusinessStatus::Completed,
        BusinessStatus::Planning,
        BusinessStatus::Failed,
        BusinessStatus::Active,
    ] {
        let updated = f
            .service
            .set_business_status(&b, &business.id, status)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
async fn update_business_validates_amounts() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;
    let business = f
        .service
        .add_business(&b, new_business(&b.id))
        .await
        .unwrap();

    let mut edited = business.clone();
    edited.funding_amount = -1.0;
    let err = f.service.update_business(&b, edited).await.unwrap_err();
    assert!(matches!(err, HevaError::Validation { .. }));

    let mut edited = business;
    edited.employees = 4;
    edited.monthly_revenue = Some(8_000.0);
    let updated = f.service.update_business(&b, edited).await.unwrap();
    assert_eq!(updated.employees, 4);
}

#[tokio::test]
async fn edits_on_missing_business_fail() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;
    let mut ghost = new_business(&b.id).into_business();
    ghost.id = "ghost".into();

    let err = f
        .service
        .update_business(&f.admin, ghost)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));

    let err = f
        .service
        .set_business_status(&f.admin, "ghost", BusinessStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, HevaError::NotFound { .. }));
    assert!(f.service.list_businesses().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn beneficiaries_for_officer_is_live() {
    let f = setup().await;
    seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    seed_beneficiary(&f, "B2", "Mombasa", None).await;

    let mine = f.service.beneficiaries_for_officer("O1").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "B1");

    seed_beneficiary(&f, "B3", "Nairobi", Some("O1")).await;
    let mine = f.service.beneficiaries_for_officer("O1").await.unwrap();
    let ids: Vec<&str> = mine.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["B1", "B3"]);
    assert_eq!(f.service.registered_count("O1").await.unwrap(), 2);
}

#[tokio::test]
async fn visibility_is_scoped_by_role() {
    let f = setup().await;
    let mine = seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    let other = seed_beneficiary(&f, "B2", "Nairobi", None).await;
    f.service
        .add_business(&mine, new_business(&mine.id))
        .await
        .unwrap();
    f.service
        .add_business(&other, new_business(&other.id))
        .await
        .unwrap();

    assert_eq!(f.service.visible_users(&f.admin).await.unwrap().len(), 4);

    let officer_view: Vec<String> = f
        .service
        .visible_users(&f.officer)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(officer_view, ["O1", "B1"]);

    let own = f.service.visible_users(&other).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, "B2");

    assert_eq!(f.service.visible_businesses(&f.admin).await.unwrap().len(), 2);
    let officer_businesses = f.service.visible_businesses(&f.officer).await.unwrap();
    assert_eq!(officer_businesses.len(), 1);
    assert_eq!(officer_businesses[0].beneficiary_id, "B1");
    assert_eq!(
        f.service.businesses_for_officer("O1").await.unwrap(),
        officer_businesses
    );
}

#[tokio::test]
async fn businesses_for_county_filters_exactly() {
    let f = setup().await;
    let b = seed_beneficiary(&f, "B1", "Nairobi", None).await;
    f.service
        .add_business(&b, new_business(&b.id))
        .await
        .unwrap();
    f.service
        .add_business(
            &b,
            NewBusiness {
                county: "Kisumu".into(),
                ..new_business(&b.id)
            },
        )
        .await
        .unwrap();

    assert_eq!(f.service.businesses_for_county("Nairobi").await.unwrap().len(), 1);
    assert_eq!(f.service.businesses_for_county("Kisumu").await.unwrap().len(), 1);
    assert!(f.service.businesses_for_county("Embu").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_stays_within_visible_users() {
    let f = setup().await;
    seed_beneficiary(&f, "B1", "Nairobi", Some("O1")).await;
    seed_beneficiary(&f, "B2", "Nairobi", None).await;

    let filter = BeneficiaryFilter {
        county: Some("Nairobi".into()),
        ..Default::default()
    };
    assert_eq!(
        f.service
            .search_beneficiaries(&f.admin, &filter)
            .await
            .unwrap()
            .len(),
        2
    );

    let found = f
        .service
        .search_beneficiaries(&f.officer, &filter)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "B1");

    let by_email = BeneficiaryFilter {
        query: Some("b2@EXAMPLE".into()),
        ..Default::default()
    };
    let found = f
        .service
        .search_beneficiaries(&f.admin, &by_email)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}
