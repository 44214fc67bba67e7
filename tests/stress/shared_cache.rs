//! Stress test: many verifications sharing one resolution cache, with
//! collaborators that count how often they are asked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use authority_chain::authority::InMemoryRoleAuthorities;
use authority_chain::credential::{
    DidServiceCredentialStore, InMemoryBlobStore, InMemoryCredentialStore,
};
use authority_chain::identity::{InMemoryDidResolver, ServiceEndpoint};
use authority_chain::status::InMemoryStatusLists;
use authority_chain::{
    AuthorityChainVerifier, AuthoritySpec, Credential, CredentialFormat, CredentialStore,
    DidDocument,
    DidResolver, ErrorKind, Identity, IssuerKey, ResolutionCache, RoleAuthority,
    RoleAuthorityLookup, RoleCredentialBuilder, VerificationSession,
};

const ADMIN: &str = "admin.roles.example";
const MANAGER: &str = "manager.roles.example";
const USER: &str = "user.roles.example";

struct Counting<T> {
    inner: T,
    calls: AtomicUsize,
}

impl<T> Counting<T> {
    fn new(inner: T) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleAuthorityLookup for Counting<InMemoryRoleAuthorities> {
    async fn get(&self, namespace: &str) -> authority_chain::Result<Option<RoleAuthority>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(namespace).await
    }
}

#[async_trait]
impl CredentialStore for Counting<InMemoryCredentialStore> {
    async fn all_credentials(&self, subject: &Identity) -> authority_chain::Result<Vec<Credential>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.all_credentials(subject).await
    }
}

#[async_trait]
impl DidResolver for Counting<InMemoryDidResolver> {
    async fn read(&self, identity: &Identity) -> authority_chain::Result<DidDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.read(identity).await
    }
}

/// root lists ADMIN; ADMIN holders issue MANAGER; MANAGER holders issue USER.
/// Proofs of either format resolve the issuer's DID document through the
/// session as well.
struct Fixture {
    authorities: Arc<Counting<InMemoryRoleAuthorities>>,
    credentials: Arc<Counting<InMemoryCredentialStore>>,
    resolver: Arc<Counting<InMemoryDidResolver>>,
    managers: Vec<IssuerKey>,
    verifier: Arc<AuthorityChainVerifier>,
}

fn fixture(manager_count: usize) -> Fixture {
    fixture_in(manager_count, CredentialFormat::Claim)
}

fn sign(builder: RoleCredentialBuilder, issuer: &IssuerKey, format: CredentialFormat) -> Credential {
    match format {
        CredentialFormat::Vc => builder.sign_vc(issuer).unwrap(),
        CredentialFormat::Claim => builder.sign_claim(issuer).unwrap(),
    }
}

fn fixture_in(manager_count: usize, format: CredentialFormat) -> Fixture {
    let root = IssuerKey::generate(None);
    let admin = IssuerKey::generate(None);
    let managers: Vec<IssuerKey> = (0..manager_count)
        .map(|_| IssuerKey::generate(None))
        .collect();

    let roles = InMemoryRoleAuthorities::new();
    roles.define(
        ADMIN,
        RoleAuthority::symmetric(AuthoritySpec::identities([root.did()])),
    );
    roles.define(MANAGER, RoleAuthority::symmetric(AuthoritySpec::role(ADMIN)));
    roles.define(USER, RoleAuthority::symmetric(AuthoritySpec::role(MANAGER)));

    let store = InMemoryCredentialStore::new();
    let resolver = InMemoryDidResolver::new();
    for key in [&root, &admin].into_iter().chain(&managers) {
        resolver.insert(key.to_document());
    }
    store.publish(sign(
        RoleCredentialBuilder::new(admin.did(), ADMIN),
        &root,
        format,
    ));
    for manager in &managers {
        store.publish(sign(
            RoleCredentialBuilder::new(manager.did(), MANAGER),
            &admin,
            format,
        ));
    }

    let authorities = Arc::new(Counting::new(roles));
    let credentials = Arc::new(Counting::new(store));
    let resolver = Arc::new(Counting::new(resolver));
    let verifier = AuthorityChainVerifier::builder()
        .authorities(authorities.clone())
        .credentials(credentials.clone())
        .did_resolver(resolver.clone())
        .status_lists(Arc::new(InMemoryStatusLists::new()))
        .build()
        .expect("verifier should build");

    Fixture {
        authorities,
        credentials,
        resolver,
        managers,
        verifier: Arc::new(verifier),
    }
}

impl Fixture {
    fn calls(&self) -> (usize, usize, usize) {
        (
            self.authorities.calls(),
            self.credentials.calls(),
            self.resolver.calls(),
        )
    }
}

#[tokio::test]
async fn stress_repeat_queries_fetch_nothing_new() {
    let fx = fixture(1);
    let session = VerificationSession::new();
    let manager = fx.managers[0].did();

    let first = fx
        .verifier
        .verify_issuer(&manager, USER, &session)
        .await
        .unwrap();
    assert!(first.verified, "{first:?}");
    let after_first = fx.calls();
    assert_eq!(after_first.0, 3, "each role definition fetched once");
    assert_eq!(after_first.1, 2, "each chain credential fetched once");

    for _ in 0..50 {
        let again = fx
            .verifier
            .verify_issuer(&manager, USER, &session)
            .await
            .unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(fx.calls(), after_first);
}

#[tokio::test]
async fn stress_repeat_vc_queries_resolve_nothing_new() {
    let fx = fixture_in(1, CredentialFormat::Vc);
    let session = VerificationSession::new();
    let manager = fx.managers[0].did();

    let first = fx
        .verifier
        .verify_issuer(&manager, USER, &session)
        .await
        .unwrap();
    assert!(first.verified, "{first:?}");
    let after_first = fx.calls();
    // admin and root, each resolved once for the proofs they signed
    assert_eq!(after_first.2, 2);
    assert_eq!(session.cache().stats().documents, 2);

    for _ in 0..50 {
        let again = fx
            .verifier
            .verify_issuer(&manager, USER, &session)
            .await
            .unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(fx.calls(), after_first);
}

#[tokio::test]
async fn stress_did_service_store_resolves_once_per_session() {
    let root = IssuerKey::generate(None);
    let admin = IssuerKey::generate(None);
    let manager = IssuerKey::generate(None);

    let roles = InMemoryRoleAuthorities::new();
    roles.define(
        ADMIN,
        RoleAuthority::symmetric(AuthoritySpec::identities([root.did()])),
    );
    roles.define(MANAGER, RoleAuthority::symmetric(AuthoritySpec::role(ADMIN)));
    roles.define(USER, RoleAuthority::symmetric(AuthoritySpec::role(MANAGER)));

    let blobs = Arc::new(InMemoryBlobStore::new());
    let admin_vc = RoleCredentialBuilder::new(admin.did(), ADMIN)
        .sign_vc(&root)
        .unwrap();
    let manager_vc = RoleCredentialBuilder::new(manager.did(), MANAGER)
        .sign_vc(&admin)
        .unwrap();
    let admin_ref = blobs.put(admin_vc.serialized().unwrap());
    let manager_ref = blobs.put(manager_vc.serialized().unwrap());

    let documents = InMemoryDidResolver::new();
    documents.insert(root.to_document());
    documents.insert(
        admin.to_document_with_services(vec![ServiceEndpoint::credential("#vc-1", admin_ref)]),
    );
    documents.insert(
        manager.to_document_with_services(vec![ServiceEndpoint::credential("#vc-1", manager_ref)]),
    );
    let resolver = Arc::new(Counting::new(documents));

    let verifier = AuthorityChainVerifier::builder()
        .authorities(Arc::new(roles))
        .credentials(Arc::new(DidServiceCredentialStore::new(
            resolver.clone(),
            blobs,
        )))
        .did_resolver(resolver.clone())
        .status_lists(Arc::new(InMemoryStatusLists::new()))
        .build()
        .expect("verifier should build");

    let session = VerificationSession::new();
    let first = verifier
        .verify_issuer(&manager.did(), USER, &session)
        .await
        .unwrap();
    assert!(first.verified, "{first:?}");
    let after_first = resolver.calls();

    for _ in 0..50 {
        let again = verifier
            .verify_issuer(&manager.did(), USER, &session)
            .await
            .unwrap();
        assert_eq!(again, first);
    }
    // credentials found through documents are cached, so the store is not
    // consulted again
    assert_eq!(resolver.calls(), after_first);
    assert_eq!(session.cache().stats().credentials, 2);
}

#[tokio::test]
async fn stress_failures_are_not_cached() {
    let fx = fixture(1);
    let session = VerificationSession::new();
    let stranger = IssuerKey::generate(None).did();

    for _ in 0..10 {
        let result = fx
            .verifier
            .verify_issuer(&stranger, USER, &session)
            .await
            .unwrap();
        assert_eq!(result.reason, Some(ErrorKind::NoCredential));
    }
    // the missing credential is looked up every time
    assert_eq!(fx.credentials.calls(), 10);
    assert_eq!(session.cache().stats().credentials, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_concurrent_sessions_share_one_cache() {
    let fx = fixture(32);
    let cache = Arc::new(ResolutionCache::new());

    let mut handles = Vec::new();
    for manager in &fx.managers {
        let verifier = fx.verifier.clone();
        let session = VerificationSession::with_cache(cache.clone());
        let manager = manager.did();
        handles.push(tokio::spawn(async move {
            let issuer = verifier.verify_issuer(&manager, USER, &session).await?;
            let status = verifier
                .check_revocation_status(&manager, USER, &session)
                .await?;
            Ok::<_, authority_chain::AuthorityError>((issuer, status))
        }));
    }
    for handle in handles {
        let (issuer, status) = handle
            .await
            .expect("task should not panic")
            .expect("verification should not error");
        assert!(issuer.verified, "{issuer:?}");
        assert!(status.verified, "{status:?}");
    }

    let stats = cache.stats();
    assert_eq!(stats.authorities, 3);
    assert_eq!(stats.credentials, 33);
    // only the two claim issuers, root and admin
    assert_eq!(stats.documents, 2);

    // Everything is warm now.
    let warm = fx.calls();
    let session = VerificationSession::with_cache(cache.clone());
    for manager in &fx.managers {
        assert!(fx
            .verifier
            .verify_issuer(&manager.did(), USER, &session)
            .await
            .unwrap()
            .verified);
    }
    assert_eq!(fx.calls(), warm);
}

#[tokio::test]
async fn stress_cleared_cache_refetches() {
    let fx = fixture(1);
    let cache = Arc::new(ResolutionCache::new());
    let manager = fx.managers[0].did();

    let session = VerificationSession::with_cache(cache.clone());
    fx.verifier
        .verify_issuer(&manager, USER, &session)
        .await
        .unwrap();
    let before = fx.calls();

    cache.clear();
    fx.verifier
        .verify_issuer(&manager, USER, &session)
        .await
        .unwrap();
    let after = fx.calls();
    assert_eq!(after.0, before.0 * 2);
    assert_eq!(after.1, before.1 * 2);
}
