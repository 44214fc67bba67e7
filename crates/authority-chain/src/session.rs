//! Verification sessions.
//!
//! A [`VerificationSession`] is created once per top-level verification (or
//! once for a batch of them) and threaded through every internal call. All
//! reads of role authorities, credentials and DID documents go through it so
//! that each distinct key is fetched from its collaborator at most once.

use std::sync::Arc;

use log::trace;

use crate::authority::{RoleAuthority, RoleAuthorityLookup};
use crate::cache::ResolutionCache;
use crate::credential::{Credential, CredentialStore};
use crate::error::Result;
use crate::identity::{DidDocument, DidResolver, Identity};

#[derive(Debug, Clone, Default)]
pub struct VerificationSession {
    cache: Arc<ResolutionCache>,
}

impl VerificationSession {
    /// A session with a fresh, private cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session over a cache owned by the caller, possibly shared with
    /// other sessions.
    pub fn with_cache(cache: Arc<ResolutionCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Role authority of `namespace`. Undefined roles are not cached.
    pub async fn role_authority(
        &self,
        lookup: &dyn RoleAuthorityLookup,
        namespace: &str,
    ) -> Result<Option<RoleAuthority>> {
        if let Some(hit) = self.cache.authority(namespace) {
            trace!("authority cache hit: {namespace}");
            return Ok(Some(hit));
        }
        let found = lookup.get(namespace).await?;
        if let Some(authority) = &found {
            self.cache.put_authority(namespace, authority.clone());
        }
        Ok(found)
    }

    /// Credential `subject` holds for `namespace`. Absent credentials are not cached.
    pub async fn credential(
        &self,
        store: &dyn CredentialStore,
        subject: &Identity,
        namespace: &str,
    ) -> Result<Option<Credential>> {
        if let Some(hit) = self.cache.credential(subject, namespace) {
            trace!("credential cache hit: {subject} / {namespace}");
            return Ok(Some(hit));
        }
        let found = store.get_credential(subject, namespace).await?;
        if let Some(credential) = &found {
            self.cache
                .put_credential(subject, namespace, credential.clone());
        }
        Ok(found)
    }

    pub async fn did_document(
        &self,
        resolver: &dyn DidResolver,
        identity: &Identity,
    ) -> Result<DidDocument> {
        if let Some(hit) = self.cache.document(identity) {
            trace!("document cache hit: {identity}");
            return Ok(hit);
        }
        let document = resolver.read(identity).await?;
        self.cache.put_document(identity, document.clone());
        Ok(document)
    }
}
