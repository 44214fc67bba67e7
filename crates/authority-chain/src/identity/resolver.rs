//! DID resolution collaborator.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{AuthorityError, Result};

use super::did::{DidDocument, Identity};

/// Resolves an identity to its DID document.
///
/// Implementations read external state (a registry contract, a web host,
/// a local file). The engine caches results per [`crate::VerificationSession`].
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn read(&self, identity: &Identity) -> Result<DidDocument>;
}

/// DID documents held in process memory, keyed by normalized address.
#[derive(Default)]
pub struct InMemoryDidResolver {
    documents: RwLock<HashMap<String, DidDocument>>,
}

impl InMemoryDidResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace a document.
    pub fn insert(&self, document: DidDocument) {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents.insert(document.id.address(), document);
    }
}

#[async_trait]
impl DidResolver for InMemoryDidResolver {
    async fn read(&self, identity: &Identity) -> Result<DidDocument> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents
            .get(&identity.address())
            .cloned()
            .ok_or_else(|| AuthorityError::DidResolution(format!("no DID document for {identity}")))
    }
}
