//! Role Hierarchy — define roles, issue credentials down a chain, verify
//! issuers and revokers, then revoke a link.
//!
//! Run with:
//!   cargo run --example role_hierarchy -p authority-chain

use std::sync::Arc;

use authority_chain::authority::InMemoryRoleAuthorities;
use authority_chain::credential::{InMemoryCredentialStore, StatusListEntry};
use authority_chain::identity::InMemoryDidResolver;
use authority_chain::status::{issue_status_list, InMemoryStatusLists, StatusBitstring};
use authority_chain::{
    AuthorityChainVerifier, AuthoritySpec, IssuerKey, RoleAuthority, RoleCredentialBuilder,
    VerificationSession,
};

const ADMIN: &str = "admin.roles.example";
const MANAGER: &str = "manager.roles.example";
const USER: &str = "user.roles.example";
const ADMIN_LIST: &str = "https://status.example/lists/admin";

#[tokio::main]
async fn main() {
    // ── Setup: a root of trust, an admin and a manager ──────────────────────
    let root = IssuerKey::generate(None);
    let admin = IssuerKey::generate(None);
    let manager = IssuerKey::generate(None);

    println!("Identities:");
    println!("  Root:    {}", root.did());
    println!("  Admin:   {}", admin.did());
    println!("  Manager: {}", manager.did());
    println!();

    let resolver = Arc::new(InMemoryDidResolver::new());
    for key in [&root, &admin, &manager] {
        resolver.insert(key.to_document());
    }

    // ── 1. Role definitions ─────────────────────────────────────────────────
    //
    // ADMIN is rooted in an explicit list. MANAGER and USER each defer to
    // the role above them, for issuing and for revoking.
    let roles = Arc::new(InMemoryRoleAuthorities::new());
    roles.define(
        ADMIN,
        RoleAuthority::symmetric(AuthoritySpec::identities([root.did()])),
    );
    roles.define(MANAGER, RoleAuthority::symmetric(AuthoritySpec::role(ADMIN)));
    roles.define(USER, RoleAuthority::symmetric(AuthoritySpec::role(MANAGER)));

    // ── 2. Credentials down the chain ───────────────────────────────────────
    let store = Arc::new(InMemoryCredentialStore::new());
    store.publish(
        RoleCredentialBuilder::new(admin.did(), ADMIN)
            .status(StatusListEntry::revocation(ADMIN_LIST, 0))
            .sign_vc(&root)
            .expect("admin credential signing should succeed"),
    );
    store.publish(
        RoleCredentialBuilder::new(manager.did(), MANAGER)
            .sign_vc(&admin)
            .expect("manager credential signing should succeed"),
    );

    let lists = Arc::new(InMemoryStatusLists::new());
    let mut bits = StatusBitstring::new(16);
    lists.publish(
        ADMIN_LIST,
        issue_status_list(&root, ADMIN_LIST, &bits, chrono::Utc::now())
            .expect("status list signing should succeed"),
    );

    let verifier = AuthorityChainVerifier::builder()
        .authorities(roles)
        .credentials(store)
        .did_resolver(resolver)
        .status_lists(lists.clone())
        .build()
        .expect("verifier should build");

    // ── 3. Verify ───────────────────────────────────────────────────────────
    let session = VerificationSession::new();
    let issuer = verifier
        .verify_issuer(&manager.did(), USER, &session)
        .await
        .expect("verify_issuer should succeed");
    println!("Manager may issue {USER}: {:?}", issuer);

    let revoker = verifier
        .verify_revoker(&admin.did(), MANAGER, &session)
        .await
        .expect("verify_revoker should succeed");
    println!("Admin may revoke {MANAGER}: {:?}", revoker);

    let status = verifier
        .check_revocation_status(&manager.did(), USER, &session)
        .await
        .expect("check_revocation_status should succeed");
    println!("Chain above manager still valid: {:?}", status);
    println!("Cache after three queries: {:?}", session.cache().stats());
    println!();

    // ── 4. Root revokes the admin credential ────────────────────────────────
    bits.set(0, true);
    lists.publish(
        ADMIN_LIST,
        issue_status_list(&root, ADMIN_LIST, &bits, chrono::Utc::now())
            .expect("status list signing should succeed"),
    );

    let status = verifier
        .check_revocation_status(&manager.did(), USER, &VerificationSession::new())
        .await
        .expect("check_revocation_status should succeed");
    println!("After revoking admin: {:?}", status);
}
