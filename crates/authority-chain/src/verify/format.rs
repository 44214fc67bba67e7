//! Format-specific proof checking.
//!
//! A chain is verified entirely in the format of its first `ByRole` hop, so
//! each format gets its own [`FormatVerifier`]. Both resolve the issuer's DID
//! document through the session cache before checking the proof against it;
//! the VC verifier additionally reports structured proof errors.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::credential::{Credential, CredentialFormat};
use crate::error::Result;
use crate::identity::{DidResolver, Identity};
use crate::proof::{ClaimProofVerifier, ProofOptions, ProofVerifier};
use crate::session::VerificationSession;

#[async_trait]
pub trait FormatVerifier: Send + Sync {
    fn format(&self) -> CredentialFormat;

    /// Whether the credential's proof holds. A credential of another format
    /// never does.
    async fn verify_proof(
        &self,
        credential: &Credential,
        session: &VerificationSession,
    ) -> Result<bool>;
}

pub struct VcFormatVerifier {
    proofs: Arc<dyn ProofVerifier>,
    resolver: Arc<dyn DidResolver>,
    options: ProofOptions,
}

impl VcFormatVerifier {
    pub fn new(
        proofs: Arc<dyn ProofVerifier>,
        resolver: Arc<dyn DidResolver>,
        options: ProofOptions,
    ) -> Self {
        Self {
            proofs,
            resolver,
            options,
        }
    }

    /// Check any serialized VC document issued by `issuer`, not only role
    /// credentials.
    pub async fn verify_document(
        &self,
        serialized: &str,
        issuer: &Identity,
        session: &VerificationSession,
    ) -> Result<bool> {
        let document = session.did_document(&*self.resolver, issuer).await?;
        let report = self.proofs.verify(serialized, &document, &self.options).await?;
        if !report.is_valid() {
            debug!("vc proof rejected: {}", report.errors.join("; "));
        }
        Ok(report.is_valid())
    }
}

#[async_trait]
impl FormatVerifier for VcFormatVerifier {
    fn format(&self) -> CredentialFormat {
        CredentialFormat::Vc
    }

    async fn verify_proof(
        &self,
        credential: &Credential,
        session: &VerificationSession,
    ) -> Result<bool> {
        let Credential::Vc(vc) = credential else {
            return Ok(false);
        };
        self.verify_document(&vc.to_json_string()?, &vc.issuer, session)
            .await
    }
}

pub struct ClaimFormatVerifier {
    claims: Arc<dyn ClaimProofVerifier>,
    resolver: Arc<dyn DidResolver>,
}

impl ClaimFormatVerifier {
    pub fn new(claims: Arc<dyn ClaimProofVerifier>, resolver: Arc<dyn DidResolver>) -> Self {
        Self { claims, resolver }
    }
}

#[async_trait]
impl FormatVerifier for ClaimFormatVerifier {
    fn format(&self) -> CredentialFormat {
        CredentialFormat::Claim
    }

    async fn verify_proof(
        &self,
        credential: &Credential,
        session: &VerificationSession,
    ) -> Result<bool> {
        let Credential::Claim(claim) = credential else {
            return Ok(false);
        };
        let document = session
            .did_document(&*self.resolver, &claim.payload().iss)
            .await?;
        let valid = self.claims.verify(&document, claim.token()).await?;
        if !valid {
            debug!("claim proof rejected for issuer {}", claim.payload().iss);
        }
        Ok(valid)
    }
}
