//! Ed25519 proof verifiers for both credential formats.

use async_trait::async_trait;
use serde_json::Value;

use crate::credential::claim::{SignedClaim, CLAIM_ALG};
use crate::credential::model::{signing_payload_of, Proof, ED25519_PROOF_TYPE};
use crate::crypto::signing;
use crate::error::{AuthorityError, Result};
use crate::identity::{DidDocument, Identity};

use super::{ClaimProofVerifier, ProofOptions, ProofReport, ProofVerifier};

/// Checks `Ed25519Signature2018` proofs on any VC document against the
/// issuer's DID document.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519ProofVerifier;

impl Ed25519ProofVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProofVerifier for Ed25519ProofVerifier {
    async fn verify(
        &self,
        serialized: &str,
        issuer_document: &DidDocument,
        options: &ProofOptions,
    ) -> Result<ProofReport> {
        let document: Value = serde_json::from_str(serialized)
            .map_err(|e| AuthorityError::MalformedCredential(e.to_string()))?;

        let proof: Proof = match document.get("proof").cloned() {
            Some(raw) => match serde_json::from_value(raw) {
                Ok(proof) => proof,
                Err(e) => return Ok(ProofReport::invalid(format!("malformed proof: {e}"))),
            },
            None => return Ok(ProofReport::invalid("credential has no proof")),
        };
        let issuer = match document.get("issuer").and_then(Value::as_str) {
            Some(issuer) => Identity::new(issuer),
            None => return Ok(ProofReport::invalid("credential has no issuer")),
        };

        let mut errors = Vec::new();
        if proof.proof_type != ED25519_PROOF_TYPE {
            errors.push(format!("unsupported proof type {}", proof.proof_type));
        }
        if proof.proof_purpose != options.proof_purpose {
            errors.push(format!(
                "proof purpose {} does not match {}",
                proof.proof_purpose, options.proof_purpose
            ));
        }
        if let Some(required) = &options.verification_method {
            if &proof.verification_method != required {
                errors.push(format!(
                    "verification method {} is not {required}",
                    proof.verification_method
                ));
            }
        }
        if issuer_document.id != issuer {
            errors.push(format!(
                "document of {} supplied for issuer {issuer}",
                issuer_document.id
            ));
        }
        if Identity::new(proof.verification_method.as_str()) != issuer {
            errors.push(format!(
                "verification method {} is not controlled by issuer {issuer}",
                proof.verification_method
            ));
        }
        if !errors.is_empty() {
            return Ok(ProofReport { errors });
        }

        let keys = match issuer_document.verifying_keys(Some(&proof.verification_method)) {
            Ok(keys) => keys,
            Err(e) => return Ok(ProofReport::invalid(e.to_string())),
        };
        let payload = signing_payload_of(document)?;

        let signed = keys
            .iter()
            .any(|key| signing::verify_from_base64(key, &payload, &proof.proof_value).is_ok());
        if signed {
            Ok(ProofReport::valid())
        } else {
            Ok(ProofReport::invalid("signature does not match issuer key"))
        }
    }
}

/// Checks `EdDSA` claim tokens against the issuer's DID document.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519ClaimVerifier;

impl Ed25519ClaimVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClaimProofVerifier for Ed25519ClaimVerifier {
    async fn verify(&self, issuer_document: &DidDocument, token: &str) -> Result<bool> {
        let claim = SignedClaim::parse(token)?;
        if claim.header().alg != CLAIM_ALG || claim.payload().iss != issuer_document.id {
            return Ok(false);
        }

        let keys = match issuer_document.verifying_keys(claim.header().kid.as_deref()) {
            Ok(keys) => keys,
            Err(_) => return Ok(false),
        };
        Ok(keys.iter().any(|key| {
            signing::verify_from_base64url(key, claim.signing_input().as_bytes(), claim.signature())
                .is_ok()
        }))
    }
}
