//! Edge case tests: malformed role graphs (cycles, self-references,
//! undefined or half-defined roles), mixed credential formats and identity
//! spelling.

use std::sync::Arc;

use authority_chain::authority::InMemoryRoleAuthorities;
use authority_chain::credential::InMemoryCredentialStore;
use authority_chain::identity::InMemoryDidResolver;
use authority_chain::status::InMemoryStatusLists;
use authority_chain::{
    AuthorityChainVerifier, AuthorityError, AuthoritySpec, Credential, ErrorKind, Identity,
    IssuerKey, RoleAuthority, RoleCredentialBuilder, VerificationResult, VerificationSession,
};

struct Graph {
    roles: Arc<InMemoryRoleAuthorities>,
    store: Arc<InMemoryCredentialStore>,
    resolver: Arc<InMemoryDidResolver>,
    verifier: AuthorityChainVerifier,
}

impl Graph {
    fn new() -> Self {
        let roles = Arc::new(InMemoryRoleAuthorities::new());
        let store = Arc::new(InMemoryCredentialStore::new());
        let resolver = Arc::new(InMemoryDidResolver::new());
        let verifier = AuthorityChainVerifier::builder()
            .authorities(roles.clone())
            .credentials(store.clone())
            .did_resolver(resolver.clone())
            .status_lists(Arc::new(InMemoryStatusLists::new()))
            .build()
            .expect("verifier should build");
        Self {
            roles,
            store,
            resolver,
            verifier,
        }
    }

    fn key(&self) -> IssuerKey {
        let key = IssuerKey::generate(None);
        self.resolver.insert(key.to_document());
        key
    }

    fn by_role(&self, namespace: &str, role: &str) {
        self.roles
            .define(namespace, RoleAuthority::symmetric(AuthoritySpec::role(role)));
    }

    fn by_list(&self, namespace: &str, identities: Vec<Identity>) {
        self.roles.define(
            namespace,
            RoleAuthority::symmetric(AuthoritySpec::identities(identities)),
        );
    }

    fn vc(&self, subject: &IssuerKey, namespace: &str, issuer: &IssuerKey) -> Credential {
        let credential = RoleCredentialBuilder::new(subject.did(), namespace)
            .sign_vc(issuer)
            .unwrap();
        self.store.publish(credential.clone());
        credential
    }

    fn claim(&self, subject: &IssuerKey, namespace: &str, issuer: &IssuerKey) -> Credential {
        let credential = RoleCredentialBuilder::new(subject.did(), namespace)
            .sign_claim(issuer)
            .unwrap();
        self.store.publish(credential.clone());
        credential
    }

    async fn issuer(&self, who: &IssuerKey, namespace: &str) -> VerificationResult {
        self.verifier
            .verify_issuer(&who.did(), namespace, &VerificationSession::new())
            .await
            .expect("verify_issuer should not error")
    }

    async fn revoker(&self, who: &IssuerKey, namespace: &str) -> VerificationResult {
        self.verifier
            .verify_revoker(&who.did(), namespace, &VerificationSession::new())
            .await
            .expect("verify_revoker should not error")
    }

    async fn status(&self, who: &IssuerKey, namespace: &str) -> VerificationResult {
        self.verifier
            .check_revocation_status(&who.did(), namespace, &VerificationSession::new())
            .await
            .expect("check_revocation_status should not error")
    }
}

// === Cycles ===

#[tokio::test]
async fn edge_three_role_cycle() {
    let g = Graph::new();
    g.by_role("a.roles", "b.roles");
    g.by_role("b.roles", "c.roles");
    g.by_role("c.roles", "a.roles");
    let holder = g.key();
    let other = g.key();
    // credentials along the loop do not help
    g.vc(&holder, "b.roles", &other);
    g.vc(&other, "c.roles", &holder);

    for namespace in ["a.roles", "b.roles", "c.roles"] {
        assert_eq!(
            g.issuer(&holder, namespace).await.reason,
            Some(ErrorKind::AuthorityCycleDetected),
            "{namespace}"
        );
        assert_eq!(
            g.status(&holder, namespace).await.reason,
            Some(ErrorKind::AuthorityCycleDetected),
            "{namespace}"
        );
    }
}

#[tokio::test]
async fn edge_self_referencing_role() {
    let g = Graph::new();
    g.by_role("loop.roles", "loop.roles");
    let holder = g.key();
    g.vc(&holder, "loop.roles", &holder);

    assert_eq!(
        g.issuer(&holder, "loop.roles").await.reason,
        Some(ErrorKind::AuthorityCycleDetected)
    );
}

#[tokio::test]
async fn edge_cycle_above_a_sound_prefix() {
    let g = Graph::new();
    g.by_role("leaf.roles", "mid.roles");
    g.by_role("mid.roles", "top.roles");
    g.by_role("top.roles", "mid.roles");
    let holder = g.key();

    // detected before any credential is asked for
    let session = VerificationSession::new();
    let result = g
        .verifier
        .verify_issuer(&holder.did(), "leaf.roles", &session)
        .await
        .unwrap();
    assert_eq!(result.reason, Some(ErrorKind::AuthorityCycleDetected));
    assert_eq!(session.cache().stats().credentials, 0);
}

#[tokio::test]
async fn edge_revoker_role_leading_into_cycle() {
    let g = Graph::new();
    g.by_role("a.roles", "b.roles");
    g.by_role("b.roles", "a.roles");
    g.roles.define(
        "guarded.roles",
        RoleAuthority::new(
            AuthoritySpec::identities(Vec::<Identity>::new()),
            AuthoritySpec::role("a.roles"),
        ),
    );
    let revoker = g.key();
    let issuer = g.key();
    g.vc(&revoker, "a.roles", &issuer);

    assert_eq!(
        g.revoker(&revoker, "guarded.roles").await.reason,
        Some(ErrorKind::AuthorityCycleDetected)
    );
}

// === Undefined and half-defined roles ===

#[tokio::test]
async fn edge_undefined_role_deep_in_chain() {
    let g = Graph::new();
    let keys: Vec<IssuerKey> = (0..5).map(|_| g.key()).collect();
    // r4 → r3 → r2 → r1 → r0, and r0 is never defined
    for i in 1..5 {
        g.by_role(&format!("r{i}.roles"), &format!("r{}.roles", i - 1));
    }
    for i in 1..5 {
        g.vc(&keys[i], &format!("r{}.roles", i - 1), &keys[i - 1]);
    }

    assert_eq!(
        g.issuer(&keys[4], "r4.roles").await.reason,
        Some(ErrorKind::NoIssuers)
    );
}

#[tokio::test]
async fn edge_role_without_issuer_side() {
    let g = Graph::new();
    let root = g.key();
    let holder = g.key();
    g.roles.define(
        "revoke-only.roles",
        RoleAuthority {
            issuer: None,
            revoker: Some(AuthoritySpec::identities([root.did()])),
        },
    );
    g.by_role("child.roles", "revoke-only.roles");
    g.vc(&holder, "revoke-only.roles", &root);

    assert_eq!(
        g.issuer(&holder, "child.roles").await.reason,
        Some(ErrorKind::InvalidIssuerType)
    );
    assert!(g.revoker(&root, "revoke-only.roles").await.verified);
}

#[tokio::test]
async fn edge_role_without_revoker_side() {
    let g = Graph::new();
    let root = g.key();
    g.roles.define(
        "issue-only.roles",
        RoleAuthority {
            issuer: Some(AuthoritySpec::identities([root.did()])),
            revoker: None,
        },
    );

    assert!(g.issuer(&root, "issue-only.roles").await.verified);
    assert_eq!(
        g.revoker(&root, "issue-only.roles").await.reason,
        Some(ErrorKind::InvalidRevokerType)
    );
    assert_eq!(
        g.revoker(&root, "never-defined.roles").await.reason,
        Some(ErrorKind::NoRevokers)
    );
}

#[tokio::test]
async fn edge_empty_identity_list_admits_nobody() {
    let g = Graph::new();
    let anyone = g.key();
    g.by_list("closed.roles", Vec::new());
    assert_eq!(
        g.issuer(&anyone, "closed.roles").await.reason,
        Some(ErrorKind::IssuerNotAuthorized)
    );
    assert_eq!(
        g.revoker(&anyone, "closed.roles").await.reason,
        Some(ErrorKind::RevokerNotAuthorized)
    );
}

// === Formats ===

#[tokio::test]
async fn edge_mixed_formats_rejected() {
    let g = Graph::new();
    let root = g.key();
    let admin = g.key();
    let manager = g.key();
    g.by_list("admin.roles", vec![root.did()]);
    g.by_role("manager.roles", "admin.roles");
    g.by_role("user.roles", "manager.roles");

    // claim at the top, VC below it
    g.claim(&admin, "admin.roles", &root);
    g.vc(&manager, "manager.roles", &admin);

    // each credential is fine on its own
    assert!(g.issuer(&admin, "manager.roles").await.verified);
    assert_eq!(
        g.issuer(&manager, "user.roles").await.reason,
        Some(ErrorKind::MixedFormatChainUnsupported)
    );
    assert_eq!(
        g.status(&manager, "user.roles").await.reason,
        Some(ErrorKind::MixedFormatChainUnsupported)
    );

    // reissuing the admin credential as a VC fixes the chain
    g.store.retract(&admin.did(), "admin.roles");
    g.vc(&admin, "admin.roles", &root);
    assert!(g.issuer(&manager, "user.roles").await.verified);
}

#[tokio::test]
async fn edge_revoker_credential_format_follows_its_chain() {
    let g = Graph::new();
    let root = g.key();
    let admin = g.key();
    let vc_lead = g.key();
    let claim_lead = g.key();
    g.by_list("admin.roles", vec![root.did()]);
    g.by_role("lead.roles", "admin.roles");
    g.roles.define(
        "team.roles",
        RoleAuthority::new(AuthoritySpec::role("lead.roles"), AuthoritySpec::role("lead.roles")),
    );
    g.claim(&admin, "admin.roles", &root);
    g.vc(&vc_lead, "lead.roles", &admin);
    g.claim(&claim_lead, "lead.roles", &admin);

    // the lead VC was issued on the strength of an admin claim
    assert_eq!(
        g.revoker(&vc_lead, "team.roles").await.reason,
        Some(ErrorKind::MixedFormatChainUnsupported)
    );
    assert!(g.revoker(&claim_lead, "team.roles").await.verified);
}

// === Identities ===

#[tokio::test]
async fn edge_identity_spelling_does_not_matter() {
    let g = Graph::new();
    let root = g.key();
    let holder = g.key();
    // listed as a bare, upper-cased address
    g.by_list("admin.roles", vec![Identity::new(root.address().to_uppercase())]);
    g.by_role("manager.roles", "admin.roles");
    g.vc(&holder, "admin.roles", &root);

    assert!(g.issuer(&root, "admin.roles").await.verified);
    let fragment = Identity::new(format!("{}#controller", root.did()));
    assert!(g
        .verifier
        .verify_issuer(&fragment, "admin.roles", &VerificationSession::new())
        .await
        .unwrap()
        .verified);

    let bare = Identity::new(holder.address().to_uppercase());
    assert!(g
        .verifier
        .verify_issuer(&bare, "manager.roles", &VerificationSession::new())
        .await
        .unwrap()
        .verified);
}

#[tokio::test]
async fn edge_credential_for_someone_else_is_ignored() {
    let g = Graph::new();
    let root = g.key();
    let holder = g.key();
    let impostor = g.key();
    g.by_list("admin.roles", vec![root.did()]);
    g.by_role("manager.roles", "admin.roles");
    g.vc(&holder, "admin.roles", &root);

    assert_eq!(
        g.issuer(&impostor, "manager.roles").await.reason,
        Some(ErrorKind::NoCredential)
    );
}

#[tokio::test]
async fn edge_unresolvable_claim_issuer_is_a_system_error() {
    let g = Graph::new();
    let root = g.key();
    let ghost = IssuerKey::generate(None);
    let holder = g.key();
    g.by_list("admin.roles", vec![root.did()]);
    g.by_role("manager.roles", "admin.roles");
    g.claim(&holder, "admin.roles", &ghost);

    let err = g
        .verifier
        .verify_issuer(&holder.did(), "manager.roles", &VerificationSession::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthorityError::DidResolution(_)), "{err}");
}
