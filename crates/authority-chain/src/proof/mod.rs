//! Proof verification collaborators.
//!
//! The engine treats proof checking as opaque: a VC verifier inspects a
//! serialized credential and reports structured errors, a claim verifier
//! checks a token. Both are handed the issuer's DID document, which the
//! caller resolves. [`ed25519`] holds the
//! concrete Ed25519 implementations of both.

pub mod ed25519;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::DidDocument;

pub use ed25519::{Ed25519ClaimVerifier, Ed25519ProofVerifier};

/// Options handed to a VC proof verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOptions {
    /// Required `proofPurpose`.
    pub proof_purpose: String,
    /// Required `verificationMethod`, when the caller pins one.
    pub verification_method: Option<String>,
}

impl ProofOptions {
    pub fn purpose(proof_purpose: impl Into<String>) -> Self {
        Self {
            proof_purpose: proof_purpose.into(),
            verification_method: None,
        }
    }
}

/// Outcome of a VC proof check. An empty error list means the proof holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofReport {
    pub errors: Vec<String>,
}

impl ProofReport {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Verifies the embedded proof of a serialized Verifiable Credential
/// against its issuer's DID document.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    async fn verify(
        &self,
        serialized: &str,
        issuer_document: &DidDocument,
        options: &ProofOptions,
    ) -> Result<ProofReport>;
}

/// Verifies a signed claim token against its issuer's DID document.
#[async_trait]
pub trait ClaimProofVerifier: Send + Sync {
    async fn verify(&self, issuer_document: &DidDocument, token: &str) -> Result<bool>;
}
