//! Issuing role credentials.
//!
//! The builder produces the same role assertion in either format:
//! a VC with an `Ed25519Signature2018` proof, or an `EdDSA` claim token.

use chrono::{DateTime, Utc};

use crate::crypto::signing;
use crate::error::Result;
use crate::identity::{Identity, IssuerKey};

use super::claim::{ClaimData, ClaimHeader, ClaimPayload, SignedClaim, CLAIM_ALG};
use super::envelope::Credential;
use super::model::{
    Proof, RoleClaim, RoleSubject, StatusListEntry, VerifiableCredential, ED25519_PROOF_TYPE,
    VC_CONTEXT,
};

/// Default proof purpose for issued credentials.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// Builder for role credentials.
pub struct RoleCredentialBuilder {
    subject: Identity,
    namespace: String,
    version: String,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    status: Option<StatusListEntry>,
    proof_purpose: String,
}

impl RoleCredentialBuilder {
    /// Start a credential asserting that `subject` holds `namespace`.
    pub fn new(subject: impl Into<Identity>, namespace: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            namespace: namespace.into(),
            version: "1".to_string(),
            issued_at: None,
            expires_at: None,
            status: None,
            proof_purpose: ASSERTION_METHOD.to_string(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Attach a status list entry so the credential can later be revoked.
    pub fn status(mut self, entry: StatusListEntry) -> Self {
        self.status = Some(entry);
        self
    }

    pub fn proof_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.proof_purpose = purpose.into();
        self
    }

    /// Sign as a Verifiable Credential.
    pub fn sign_vc(self, issuer: &IssuerKey) -> Result<Credential> {
        let issued_at = self.issued_at.unwrap_or_else(crate::time::now);
        let mut vc = VerifiableCredential {
            context: vec![VC_CONTEXT.to_string()],
            id: Some(format!(
                "urn:role:{}:{}:{}",
                self.namespace,
                self.subject.address(),
                issued_at.timestamp()
            )),
            types: vec![
                "VerifiableCredential".to_string(),
                "RoleCredential".to_string(),
            ],
            issuer: issuer.did(),
            issuance_date: crate::time::to_rfc3339(&issued_at),
            expiration_date: self.expires_at.as_ref().map(crate::time::to_rfc3339),
            credential_subject: RoleSubject {
                id: self.subject,
                role: RoleClaim {
                    namespace: self.namespace,
                    version: self.version,
                },
            },
            credential_status: self.status,
            proof: None,
        };
        vc.proof = Some(sign_proof(&vc.signing_payload()?, issuer, &self.proof_purpose, issued_at));
        Ok(Credential::Vc(vc))
    }

    /// Sign as a compact claim token.
    pub fn sign_claim(self, issuer: &IssuerKey) -> Result<Credential> {
        let issued_at = self.issued_at.unwrap_or_else(crate::time::now);
        let header = ClaimHeader {
            alg: CLAIM_ALG.to_string(),
            typ: Some("JWT".to_string()),
            kid: Some(issuer.verification_method_id()),
        };
        let payload = ClaimPayload {
            iss: issuer.did(),
            sub: self.subject,
            claim_data: ClaimData {
                claim_type: self.namespace,
                claim_type_version: self.version,
            },
            iat: Some(issued_at.timestamp()),
            exp: self.expires_at.map(|at| at.timestamp()),
            credential_status: self.status,
        };
        let claim = SignedClaim::assemble(&header, &payload, |input| {
            signing::sign_to_base64url(issuer.signing_key(), input)
        })?;
        Ok(Credential::Claim(claim))
    }
}

/// Build an Ed25519 proof over `payload`.
pub fn sign_proof(
    payload: &[u8],
    issuer: &IssuerKey,
    purpose: &str,
    created: DateTime<Utc>,
) -> Proof {
    Proof {
        proof_type: ED25519_PROOF_TYPE.to_string(),
        created: crate::time::to_rfc3339(&created),
        proof_purpose: purpose.to_string(),
        verification_method: issuer.verification_method_id(),
        proof_value: signing::sign_to_base64(issuer.signing_key(), payload),
    }
}
