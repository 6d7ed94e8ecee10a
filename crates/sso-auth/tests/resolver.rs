//! End-to-end resolution against an in-memory role store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sso_auth::{LookupError, Resolver, RoleLookup, StaticRoleLookup};
use sso_core::{
    AuthEventMeta, AuthEventPayload, MembershipStrategy, ResolverPolicy, RoleId, RoleRecord,
    RoleSource, SsoError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Static lookup that counts how often it was queried.
struct CountingLookup {
    inner: StaticRoleLookup,
    calls: AtomicUsize,
}

impl CountingLookup {
    fn with_role(name: &str, id: i64) -> Self {
        Self {
            inner: StaticRoleLookup::default().with_role(name, id),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleLookup for CountingLookup {
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_name(name).await
    }
}

struct FailingLookup;

#[async_trait]
impl RoleLookup for FailingLookup {
    async fn find_by_name(&self, _name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        Err(LookupError::Http("connection refused".into()))
    }
}

fn meta(user_info: Value) -> AuthEventMeta {
    serde_json::from_value(json!({
        "identifier": "ext-ada",
        "providerPayload": { "userInfo": user_info }
    }))
    .expect("meta")
}

fn payload() -> AuthEventPayload {
    json!({ "email": "ada@example.com", "provider": "sso" })
        .as_object()
        .cloned()
        .expect("payload object")
}

fn ada_user_info() -> Value {
    json!({
        "organizations.0": "org1",
        "organization_roles.0": "org1:school_admin",
        "name": "Ada Lovelace",
        "custom_data.identification": "123"
    })
}

fn resolver() -> Resolver {
    Resolver::new("org1", ResolverPolicy::default())
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolves_the_documented_example() {
    let lookup = CountingLookup::with_role("Admin", 42);

    let resolved = resolver()
        .resolve(payload(), &meta(ada_user_info()), &lookup)
        .await
        .expect("resolves");

    assert_eq!(
        Value::Object(resolved),
        json!({
            "email": "ada@example.com",
            "provider": "sso",
            "role": 42,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "external_identifier": "ext-ada",
            "identification": "123"
        })
    );
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn role_key_shares_the_membership_index() {
    let lookup = StaticRoleLookup::default()
        .with_role("Admin", 1_i64)
        .with_role("Client", 2_i64);
    let info = json!({
        "organizations.0": "org9",
        "organizations.1": "org1",
        "organization_roles.0": "org9:Admin",
        "organization_roles.1": "org1:Client",
        "custom_data.identification": "id"
    });

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.role, RoleId::Int(2));
}

#[tokio::test]
async fn nested_user_info_resolves_like_flat() {
    let lookup = StaticRoleLookup::default().with_role("Admin", 42_i64);
    let info = json!({
        "organizations": ["org1"],
        "organization_roles": ["org1:school_admin"],
        "name": "Ada",
        "custom_data": { "identification": "123" }
    });

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.first_name.as_deref(), Some("Ada"));
    assert_eq!(update.last_name, None);
    assert_eq!(update.identification.as_deref(), Some("123"));
}

#[tokio::test]
async fn first_matching_membership_in_bag_order_wins() {
    let lookup = StaticRoleLookup::default()
        .with_role("Admin", 1_i64)
        .with_role("Client", 2_i64);
    let info = json!({
        "organizations.2": "org1",
        "organizations.0": "org1",
        "organization_roles.0": "org1:Client",
        "organization_roles.2": "org1:Admin",
        "custom_data.identification": "id"
    });

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.role, RoleId::Int(1));
}

#[tokio::test]
async fn nested_organization_objects_pair_with_their_role() {
    let lookup = StaticRoleLookup::default()
        .with_role("Admin", 42_i64)
        .with_role("Client", 7_i64);
    let info = json!({
        "organizations": [{ "id": "org9" }, { "id": "org1", "name": "Acme" }],
        "organization_roles": ["org9:Client", "org1:school_admin"],
        "custom_data": { "identification": "123" }
    });

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.role, RoleId::Int(42));
}

#[tokio::test]
async fn missing_aligned_role_falls_back_to_roles_claim() {
    let lookup = StaticRoleLookup::default().with_role("Client", 7_i64);
    let info = json!({
        "organizations.0": "org1",
        "roles.0": "client",
        "custom_data.identification": "9"
    });

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.role, RoleId::Int(7));
}

#[tokio::test]
async fn direct_field_strategy_uses_school_scan() {
    let policy = ResolverPolicy {
        membership: MembershipStrategy::DirectField,
        ..ResolverPolicy::default()
    };
    let lookup = StaticRoleLookup::default().with_role("Teacher", "t-1");
    let info = json!({
        "organization_data.0.id": "org1",
        "organization_roles.0": "org2:school_admin",
        "organization_roles.1": "org1:school_teacher",
        "custom_data.identification": "5"
    });

    let update = Resolver::new("org1", policy)
        .derive(&meta(info), &lookup)
        .await
        .expect("derive");
    assert_eq!(update.role, RoleId::from("t-1"));
}

#[tokio::test]
async fn optional_identification_is_kept_when_present() {
    let policy = ResolverPolicy {
        require_identification: false,
        ..ResolverPolicy::default()
    };
    let lookup = StaticRoleLookup::default().with_role("Admin", 42_i64);
    let resolver = Resolver::new("org1", policy);

    let mut info = ada_user_info();
    let update = resolver
        .derive(&meta(info.clone()), &lookup)
        .await
        .expect("derive");
    assert_eq!(update.identification.as_deref(), Some("123"));

    info["custom_data.identification"] = Value::Null;
    let update = resolver.derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.identification, None);
}

#[tokio::test]
async fn missing_name_yields_null_names() {
    let lookup = StaticRoleLookup::default().with_role("Admin", 42_i64);
    let mut info = ada_user_info();
    info.as_object_mut().expect("object").remove("name");

    let update = resolver().derive(&meta(info), &lookup).await.expect("derive");
    assert_eq!(update.first_name, None);
    assert_eq!(update.last_name, None);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unset_organization_is_fatal() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let error = Resolver::new("  ", ResolverPolicy::default())
        .derive(&meta(ada_user_info()), &lookup)
        .await
        .expect_err("no organization");

    assert_eq!(error, SsoError::MissingOrganizationId);
    assert!(error.is_fatal());
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn absent_or_empty_user_info_is_user_info_required() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let cases = [
        AuthEventMeta::default(),
        serde_json::from_value(json!({ "providerPayload": { "userInfo": null } })).expect("meta"),
        meta(json!({})),
    ];

    for meta in cases {
        let error = resolver()
            .derive(&meta, &lookup)
            .await
            .expect_err("no user info");
        assert_eq!(error, SsoError::UserInfoRequired);
    }
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn wrong_organization_stops_before_role_extraction() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({
        "organizations.0": "org2",
        "organization_roles.0": "org1:school_admin",
        "custom_data.identification": "123"
    });

    let error = resolver()
        .derive(&meta(info), &lookup)
        .await
        .expect_err("wrong org");
    assert_eq!(error, SsoError::WrongOrganization);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn user_without_memberships_is_wrong_organization() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({ "name": "Ada", "roles": "Admin" });

    let error = resolver()
        .derive(&meta(info), &lookup)
        .await
        .expect_err("no membership");
    assert_eq!(error, SsoError::WrongOrganization);
}

#[tokio::test]
async fn direct_field_strategy_without_the_field_is_wrong_organization() {
    let policy = ResolverPolicy {
        membership: MembershipStrategy::DirectField,
        ..ResolverPolicy::default()
    };
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({
        "organizations.0": "org1",
        "organization_roles.0": "org1:school_admin",
        "custom_data.identification": "123"
    });

    let error = Resolver::new("org1", policy)
        .derive(&meta(info), &lookup)
        .await
        .expect_err("no direct field");
    assert_eq!(error, SsoError::WrongOrganization);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn non_numeric_membership_index_is_internal() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({ "organizations.primary": "org1" });

    let error = resolver()
        .derive(&meta(info), &lookup)
        .await
        .expect_err("bad index");
    assert_eq!(
        error,
        SsoError::InvalidMembershipIndex {
            slot: "primary".into()
        }
    );
    assert_eq!(error.code(), "INTERNAL");
}

#[tokio::test]
async fn no_role_claim_is_user_has_no_role() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({
        "organizations.0": "org1",
        "organization_roles.1": "org2:school_admin",
        "roles": "viewer"
    });

    let error = resolver()
        .derive(&meta(info), &lookup)
        .await
        .expect_err("no role");
    assert_eq!(error, SsoError::UserHasNoRole);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn aligned_only_policy_does_not_scan() {
    let policy = ResolverPolicy {
        role_sources: vec![RoleSource::Aligned],
        ..ResolverPolicy::default()
    };
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({
        "organizations.0": "org1",
        "organization_roles.1": "org1:school_admin"
    });

    let error = Resolver::new("org1", policy)
        .derive(&meta(info), &lookup)
        .await
        .expect_err("no aligned role");
    assert_eq!(error, SsoError::UserHasNoRole);
}

#[tokio::test]
async fn empty_role_token_is_unextractable() {
    let lookup = CountingLookup::with_role("Admin", 42);
    let info = json!({
        "organizations.0": "org1",
        "organization_roles.0": "org1:"
    });

    let error = resolver()
        .derive(&meta(info), &lookup)
        .await
        .expect_err("empty token");
    assert_eq!(
        error,
        SsoError::RoleNameUnextractable {
            raw: "org1:".into()
        }
    );
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn unknown_role_is_role_not_found() {
    let lookup = CountingLookup::with_role("Client", 1);

    let error = resolver()
        .derive(&meta(ada_user_info()), &lookup)
        .await
        .expect_err("unknown role");
    assert_eq!(
        error,
        SsoError::RoleNotFound {
            name: "Admin".into()
        }
    );
    assert_eq!(error.status(), 404);
}

#[tokio::test]
async fn lookup_failure_is_internal() {
    let error = resolver()
        .derive(&meta(ada_user_info()), &FailingLookup)
        .await
        .expect_err("lookup down");
    assert!(matches!(error, SsoError::Lookup(ref message) if message.contains("connection refused")));
    assert_eq!(error.status(), 500);
}

#[tokio::test]
async fn missing_identification_is_rejected() {
    let lookup = CountingLookup::with_role("Admin", 42);
    for identification in [Value::Null, json!(""), json!("   ")] {
        let mut info = ada_user_info();
        info["custom_data.identification"] = identification;

        let error = resolver()
            .derive(&meta(info), &lookup)
            .await
            .expect_err("no identification");
        assert_eq!(error, SsoError::IdentificationRequired);
        assert_eq!(error.status(), 400);
    }
}
