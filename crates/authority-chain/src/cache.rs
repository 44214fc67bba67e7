//! Per-resolution caches.
//!
//! Three independent maps populated lazily while chains are walked:
//!
//! | cache        | key                               | value            |
//! |--------------|-----------------------------------|------------------|
//! | authorities  | role namespace                    | `RoleAuthority`  |
//! | credentials  | (subject address, role namespace) | `Credential`     |
//! | documents    | identity address                  | `DidDocument`    |
//!
//! The caller owns the cache lifetime. Entries are never invalidated or
//! expired here; concurrent writers to the same key race and the last write
//! wins, which is fine because every value for a key is derived from the same
//! external source.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::authority::RoleAuthority;
use crate::credential::Credential;
use crate::identity::{DidDocument, Identity};

type CredentialKey = (String, String);

/// Entry counts, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub authorities: usize,
    pub credentials: usize,
    pub documents: usize,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    authorities: RwLock<HashMap<String, RoleAuthority>>,
    credentials: RwLock<HashMap<CredentialKey, Credential>>,
    documents: RwLock<HashMap<String, DidDocument>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Role authorities ─────────────────────────────────────────────────────

    pub fn authority(&self, namespace: &str) -> Option<RoleAuthority> {
        read(&self.authorities).get(namespace).cloned()
    }

    pub fn put_authority(&self, namespace: &str, authority: RoleAuthority) {
        write(&self.authorities).insert(namespace.to_string(), authority);
    }

    // ── Credentials ──────────────────────────────────────────────────────────

    pub fn credential(&self, subject: &Identity, namespace: &str) -> Option<Credential> {
        read(&self.credentials)
            .get(&credential_key(subject, namespace))
            .cloned()
    }

    pub fn put_credential(&self, subject: &Identity, namespace: &str, credential: Credential) {
        write(&self.credentials).insert(credential_key(subject, namespace), credential);
    }

    // ── DID documents ────────────────────────────────────────────────────────

    pub fn document(&self, identity: &Identity) -> Option<DidDocument> {
        read(&self.documents).get(&identity.address()).cloned()
    }

    pub fn put_document(&self, identity: &Identity, document: DidDocument) {
        write(&self.documents).insert(identity.address(), document);
    }

    // ── Maintenance ──────────────────────────────────────────────────────────

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            authorities: read(&self.authorities).len(),
            credentials: read(&self.credentials).len(),
            documents: read(&self.documents).len(),
        }
    }

    /// Drop every entry. Only the owner of the cache should call this.
    pub fn clear(&self) {
        write(&self.authorities).clear();
        write(&self.credentials).clear();
        write(&self.documents).clear();
    }
}

fn credential_key(subject: &Identity, namespace: &str) -> CredentialKey {
    (subject.address(), namespace.to_string())
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
