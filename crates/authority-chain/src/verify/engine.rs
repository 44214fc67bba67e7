//! The authority chain verifier.
//!
//! Holds references to the collaborators and exposes the four entry points.
//! Every entry point takes a [`VerificationSession`]; reuse one session (or
//! one shared [`crate::ResolutionCache`]) across calls to avoid refetching.
//!
//! # Example
//!
//! ```rust,ignore
//! let verifier = AuthorityChainVerifier::builder()
//!     .authorities(roles)
//!     .credentials(store)
//!     .did_resolver(resolver)
//!     .status_lists(lists)
//!     .build()?;
//!
//! let session = VerificationSession::new();
//! let result = verifier.verify_issuer(&issuer, "manager.roles.example", &session).await?;
//! ```

use std::sync::Arc;

use log::debug;

use crate::authority::{AuthoritySpec, RoleAuthorityLookup};
use crate::config::VerifierConfig;
use crate::credential::{CredentialFormat, CredentialStore};
use crate::error::{AuthorityError, Result};
use crate::identity::{DidResolver, Identity};
use crate::proof::{
    ClaimProofVerifier, Ed25519ClaimVerifier, Ed25519ProofVerifier, ProofOptions, ProofVerifier,
};
use crate::session::VerificationSession;
use crate::status::StatusListChecker;

use super::checks::{IssuerCheck, RevocationCheck};
use super::format::{ClaimFormatVerifier, FormatVerifier, VcFormatVerifier};
use super::result::{ErrorKind, IssuanceOutcome, VerificationResult};
use super::walk::ChainWalk;

pub struct AuthorityChainVerifier {
    authorities: Arc<dyn RoleAuthorityLookup>,
    credentials: Arc<dyn CredentialStore>,
    status_lists: Arc<dyn StatusListChecker>,
    vc: VcFormatVerifier,
    claim: ClaimFormatVerifier,
    config: VerifierConfig,
}

impl AuthorityChainVerifier {
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Whether `issuer` may issue credentials for `namespace`.
    ///
    /// An identity-list authority is checked directly. A role authority
    /// requires `issuer` to hold a credential for that role whose own issuer
    /// passes the same check, all the way up to an identity-list root.
    pub async fn verify_issuer(
        &self,
        issuer: &Identity,
        namespace: &str,
        session: &VerificationSession,
    ) -> Result<VerificationResult> {
        debug!("verify_issuer {issuer} for {namespace}");
        self.walk(None)
            .run(issuer, namespace, &IssuerCheck { engine: self }, session)
            .await
    }

    /// Fetch `subject`'s credential for `namespace` and check its proof.
    pub async fn verify_issuance(
        &self,
        subject: &Identity,
        namespace: &str,
        session: &VerificationSession,
    ) -> Result<IssuanceOutcome> {
        let Some(credential) = session
            .credential(&*self.credentials, subject, namespace)
            .await?
        else {
            return Ok(IssuanceOutcome::Rejected(ErrorKind::NoCredential));
        };
        let verifier = self.format_verifier(credential.format());
        if !verifier.verify_proof(&credential, session).await? {
            return Ok(IssuanceOutcome::Rejected(ErrorKind::InvalidCredentialProof));
        }
        Ok(IssuanceOutcome::Verified(credential))
    }

    /// Whether `revoker` may revoke credentials for `namespace`.
    ///
    /// A role authority requires `revoker` to hold a verified credential for
    /// that role, issued by someone who passes [`Self::verify_issuer`] for it.
    pub async fn verify_revoker(
        &self,
        revoker: &Identity,
        namespace: &str,
        session: &VerificationSession,
    ) -> Result<VerificationResult> {
        debug!("verify_revoker {revoker} for {namespace}");
        self.revoker_check(revoker, namespace, None, session).await
    }

    /// Walk up the issuance chain above `issuer` for `namespace`, failing on
    /// the first expired link or link revoked by an authorized revoker.
    /// Reaching an identity-list root means nothing further can be revoked.
    pub async fn check_revocation_status(
        &self,
        issuer: &Identity,
        namespace: &str,
        session: &VerificationSession,
    ) -> Result<VerificationResult> {
        debug!("check_revocation_status {issuer} for {namespace}");
        self.walk(None)
            .run(issuer, namespace, &RevocationCheck { engine: self }, session)
            .await
    }

    /// Revoker check with the authorizing credential optionally pinned to
    /// the format of the chain being checked.
    pub(super) async fn revoker_check(
        &self,
        revoker: &Identity,
        namespace: &str,
        format: Option<CredentialFormat>,
        session: &VerificationSession,
    ) -> Result<VerificationResult> {
        let Some(authority) = session
            .role_authority(&*self.authorities, namespace)
            .await?
        else {
            return Ok(VerificationResult::failed(ErrorKind::NoRevokers));
        };

        let role = match authority.revoker {
            None => return Ok(VerificationResult::failed(ErrorKind::InvalidRevokerType)),
            Some(AuthoritySpec::ByIdentityList { identities }) => {
                return Ok(if identities.contains(revoker) {
                    VerificationResult::verified()
                } else {
                    VerificationResult::failed(ErrorKind::RevokerNotAuthorized)
                });
            }
            Some(AuthoritySpec::ByRole { role_namespace }) => role_namespace,
        };

        let credential = match self.verify_issuance(revoker, &role, session).await? {
            IssuanceOutcome::Verified(credential) => credential,
            IssuanceOutcome::Rejected(reason) => return Ok(VerificationResult::failed(reason)),
        };
        if format.is_some_and(|expected| expected != credential.format()) {
            return Ok(VerificationResult::failed(
                ErrorKind::MixedFormatChainUnsupported,
            ));
        }

        self.walk(Some(credential.format()))
            .run(credential.issuer(), &role, &IssuerCheck { engine: self }, session)
            .await
    }

    pub(super) fn format_verifier(&self, format: CredentialFormat) -> &dyn FormatVerifier {
        match format {
            CredentialFormat::Vc => &self.vc,
            CredentialFormat::Claim => &self.claim,
        }
    }

    pub(super) fn vc_verifier(&self) -> &VcFormatVerifier {
        &self.vc
    }

    pub(super) fn status_lists(&self) -> &dyn StatusListChecker {
        &*self.status_lists
    }

    fn walk(&self, format: Option<CredentialFormat>) -> ChainWalk<'_> {
        ChainWalk::new(
            &*self.authorities,
            &*self.credentials,
            self.config.max_chain_depth,
        )
        .pinned(format)
    }
}

/// Builder for [`AuthorityChainVerifier`].
///
/// Role authorities, credentials, a DID resolver and status lists are
/// required. Proof verifiers default to the Ed25519 implementations.
#[derive(Default)]
pub struct VerifierBuilder {
    authorities: Option<Arc<dyn RoleAuthorityLookup>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    did_resolver: Option<Arc<dyn DidResolver>>,
    status_lists: Option<Arc<dyn StatusListChecker>>,
    proof_verifier: Option<Arc<dyn ProofVerifier>>,
    claim_verifier: Option<Arc<dyn ClaimProofVerifier>>,
    config: VerifierConfig,
}

impl VerifierBuilder {
    pub fn authorities(mut self, authorities: Arc<dyn RoleAuthorityLookup>) -> Self {
        self.authorities = Some(authorities);
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn did_resolver(mut self, resolver: Arc<dyn DidResolver>) -> Self {
        self.did_resolver = Some(resolver);
        self
    }

    pub fn status_lists(mut self, status_lists: Arc<dyn StatusListChecker>) -> Self {
        self.status_lists = Some(status_lists);
        self
    }

    pub fn proof_verifier(mut self, verifier: Arc<dyn ProofVerifier>) -> Self {
        self.proof_verifier = Some(verifier);
        self
    }

    pub fn claim_verifier(mut self, verifier: Arc<dyn ClaimProofVerifier>) -> Self {
        self.claim_verifier = Some(verifier);
        self
    }

    pub fn config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// # Errors
    ///
    /// `Config` when a required collaborator is missing or the configuration
    /// is invalid.
    pub fn build(self) -> Result<AuthorityChainVerifier> {
        self.config.validate()?;
        let resolver = required(self.did_resolver, "did_resolver")?;
        let proofs: Arc<dyn ProofVerifier> = match self.proof_verifier {
            Some(verifier) => verifier,
            None => Arc::new(Ed25519ProofVerifier::new()),
        };
        let claims: Arc<dyn ClaimProofVerifier> = match self.claim_verifier {
            Some(verifier) => verifier,
            None => Arc::new(Ed25519ClaimVerifier::new()),
        };

        Ok(AuthorityChainVerifier {
            authorities: required(self.authorities, "authorities")?,
            credentials: required(self.credentials, "credentials")?,
            status_lists: required(self.status_lists, "status_lists")?,
            vc: VcFormatVerifier::new(
                proofs,
                resolver.clone(),
                ProofOptions::purpose(self.config.vc_proof_purpose.clone()),
            ),
            claim: ClaimFormatVerifier::new(claims, resolver),
            config: self.config,
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| AuthorityError::Config(format!("verifier needs {name}")))
}
