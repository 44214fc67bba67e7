//! Identity normalization and DID documents.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::crypto::keys::Ed25519KeyPair;
use crate::error::{AuthorityError, Result};

/// Service type marking an endpoint that serves credential blobs.
pub const CREDENTIAL_SERVICE_TYPE: &str = "CredentialStore";

/// A DID or bare address identifying a credential party.
///
/// The raw string is preserved for display and serialization. Equality,
/// hashing and ordering use [`Identity::address`], which strips the method
/// and network prefix, drops any `#fragment` and lower-cases the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identity exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalized address component used for every comparison.
    pub fn address(&self) -> String {
        let without_fragment = self.0.split('#').next().unwrap_or(&self.0);
        let last = without_fragment
            .rsplit(':')
            .next()
            .unwrap_or(without_fragment);
        last.trim().to_ascii_lowercase()
    }

    /// True when the identity carries a `did:` method prefix.
    pub fn is_did(&self) -> bool {
        self.0.starts_with("did:")
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().cmp(&other.address())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A public key entry of a DID document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub controller: Identity,
    #[serde(rename = "publicKeyBase64")]
    pub public_key_base64: String,
}

/// A service entry of a DID document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "serviceEndpoint")]
    pub endpoint: String,
}

impl ServiceEndpoint {
    /// An endpoint pointing at a content-addressed credential blob.
    pub fn credential(id: impl Into<String>, blob_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_type: CREDENTIAL_SERVICE_TYPE.to_string(),
            endpoint: blob_ref.into(),
        }
    }
}

/// The subset of a DID document the verifier reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DidDocument {
    pub id: Identity,
    #[serde(default, rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub service: Vec<ServiceEndpoint>,
}

impl DidDocument {
    pub fn new(id: Identity) -> Self {
        Self {
            id,
            verification_method: Vec::new(),
            service: Vec::new(),
        }
    }

    /// Look up a verification key by method id, or every key when `method_id` is `None`.
    pub fn verifying_keys(&self, method_id: Option<&str>) -> Result<Vec<VerifyingKey>> {
        let keys = self
            .verification_method
            .iter()
            .filter(|vm| method_id.map_or(true, |id| vm.id == id))
            .map(|vm| Ed25519KeyPair::verifying_key_from_base64(&vm.public_key_base64))
            .collect::<Result<Vec<_>>>()?;

        if keys.is_empty() {
            return Err(AuthorityError::DidResolution(match method_id {
                Some(id) => format!("{}: no verification method {id}", self.id),
                None => format!("{}: document has no verification methods", self.id),
            }));
        }
        Ok(keys)
    }

    /// Blob references of all credential service endpoints.
    pub fn credential_endpoints(&self) -> impl Iterator<Item = &str> {
        self.service
            .iter()
            .filter(|s| s.service_type == CREDENTIAL_SERVICE_TYPE)
            .map(|s| s.endpoint.as_str())
    }
}
