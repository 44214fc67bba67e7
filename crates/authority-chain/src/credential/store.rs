//! Credential store collaborator and its adapters.
//!
//! - [`InMemoryCredentialStore`] — credentials indexed by subject address.
//! - [`DidServiceCredentialStore`] — credentials located through the
//!   `CredentialStore` service endpoints of the subject's DID document and
//!   fetched from a content-addressed [`BlobStore`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::warn;
use sha2::{Digest, Sha256};

use crate::error::{AuthorityError, Result};
use crate::identity::{DidResolver, Identity};

use super::envelope::Credential;

/// Source of credentials published for a subject.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All credentials published for `subject`, in publication order.
    async fn all_credentials(&self, subject: &Identity) -> Result<Vec<Credential>>;

    /// The first published credential of `subject` for `namespace`.
    async fn get_credential(
        &self,
        subject: &Identity,
        namespace: &str,
    ) -> Result<Option<Credential>> {
        Ok(self
            .all_credentials(subject)
            .await?
            .into_iter()
            .find(|c| c.role_namespace() == namespace))
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

/// Credentials held in process memory.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    by_subject: RwLock<HashMap<String, Vec<Credential>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a credential under its subject.
    pub fn publish(&self, credential: Credential) {
        self.by_subject
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(credential.subject().address())
            .or_default()
            .push(credential);
    }

    /// Remove every credential `subject` holds for `namespace`. Returns how many were removed.
    pub fn retract(&self, subject: &Identity, namespace: &str) -> usize {
        let mut by_subject = self
            .by_subject
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(list) = by_subject.get_mut(&subject.address()) else {
            return 0;
        };
        let before = list.len();
        list.retain(|c| c.role_namespace() != namespace);
        before - list.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn all_credentials(&self, subject: &Identity) -> Result<Vec<Credential>> {
        Ok(self
            .by_subject
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&subject.address())
            .cloned()
            .unwrap_or_default())
    }
}

// ── Content-addressed blobs ──────────────────────────────────────────────────

/// Content-addressed storage of raw credential documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, blob_ref: &str) -> Result<String>;
}

/// Blobs held in process memory, addressed by hex SHA-256 of their content.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` and return its address.
    pub fn put(&self, content: impl Into<String>) -> String {
        let content = content.into();
        let address = hex::encode(Sha256::digest(content.as_bytes()));
        self.blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(address.clone(), content);
        address
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, blob_ref: &str) -> Result<String> {
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(blob_ref)
            .cloned()
            .ok_or_else(|| AuthorityError::NotFound(format!("blob {blob_ref}")))
    }
}

// ── DID-service backed store ─────────────────────────────────────────────────

/// Credentials published through DID document service endpoints.
///
/// Blobs that do not parse as a credential, or whose subject is not the
/// document owner, are skipped with a warning. A blob that cannot be
/// fetched is an error.
pub struct DidServiceCredentialStore {
    resolver: Arc<dyn DidResolver>,
    blobs: Arc<dyn BlobStore>,
}

impl DidServiceCredentialStore {
    pub fn new(resolver: Arc<dyn DidResolver>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { resolver, blobs }
    }
}

#[async_trait]
impl CredentialStore for DidServiceCredentialStore {
    async fn all_credentials(&self, subject: &Identity) -> Result<Vec<Credential>> {
        let document = self.resolver.read(subject).await?;
        let mut credentials = Vec::new();

        for blob_ref in document.credential_endpoints() {
            let raw = self.blobs.get(blob_ref).await?;
            match Credential::parse(&raw) {
                Ok(credential) if credential.subject() == subject => credentials.push(credential),
                Ok(credential) => warn!(
                    "blob {blob_ref} in {subject} names another subject ({})",
                    credential.subject()
                ),
                Err(e) => warn!("blob {blob_ref} in {subject} is not a credential: {e}"),
            }
        }

        Ok(credentials)
    }
}
