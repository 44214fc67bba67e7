//! The two per-hop checks run on the chain walk.

use async_trait::async_trait;
use log::debug;

use crate::error::Result;
use crate::identity::Identity;
use crate::session::VerificationSession;
use crate::status::EntryStatus;
use crate::time;

use super::engine::AuthorityChainVerifier;
use super::result::{ErrorKind, VerificationResult};
use super::walk::{ChainLink, HopCheck};

/// Issuer verification: roots check list membership, links check proofs.
pub(super) struct IssuerCheck<'a> {
    pub(super) engine: &'a AuthorityChainVerifier,
}

#[async_trait]
impl HopCheck for IssuerCheck<'_> {
    async fn at_root(
        &self,
        holder: &Identity,
        identities: &[Identity],
        _session: &VerificationSession,
    ) -> Result<VerificationResult> {
        if identities.contains(holder) {
            Ok(VerificationResult::verified())
        } else {
            Ok(VerificationResult::failed(ErrorKind::IssuerNotAuthorized))
        }
    }

    async fn at_link(
        &self,
        link: &ChainLink<'_>,
        session: &VerificationSession,
    ) -> Result<Option<ErrorKind>> {
        let verifier = self.engine.format_verifier(link.credential.format());
        if verifier.verify_proof(link.credential, session).await? {
            Ok(None)
        } else {
            Ok(Some(ErrorKind::InvalidCredentialProof))
        }
    }
}

/// Revocation status: roots are trusted as-is, links must be unexpired and
/// not revoked by an authorized revoker.
pub(super) struct RevocationCheck<'a> {
    pub(super) engine: &'a AuthorityChainVerifier,
}

#[async_trait]
impl HopCheck for RevocationCheck<'_> {
    async fn at_root(
        &self,
        _holder: &Identity,
        _identities: &[Identity],
        _session: &VerificationSession,
    ) -> Result<VerificationResult> {
        Ok(VerificationResult::verified())
    }

    async fn at_link(
        &self,
        link: &ChainLink<'_>,
        session: &VerificationSession,
    ) -> Result<Option<ErrorKind>> {
        let credential = link.credential;
        let status = credential.status();

        let check_expiry =
            status.is_some() || self.engine.config().check_expiration_without_status;
        if check_expiry && credential.is_expired_at(&time::now())? {
            return Ok(Some(ErrorKind::IssuerCredentialExpired));
        }
        let Some(entry) = status else {
            return Ok(None);
        };

        if self.engine.status_lists().verify(entry).await? == EntryStatus::Active {
            return Ok(None);
        }

        // The bit is set; it only counts if the list's issuer may revoke.
        let list = self
            .engine
            .status_lists()
            .fetch(&entry.status_list_credential)
            .await?;
        if !self
            .engine
            .vc_verifier()
            .verify_document(&list.to_json_string()?, &list.issuer, session)
            .await?
        {
            return Ok(Some(ErrorKind::InvalidCredentialProof));
        }

        let revoker = self
            .engine
            .revoker_check(
                &list.issuer,
                link.required_role,
                Some(credential.format()),
                session,
            )
            .await?;
        match revoker.into_result() {
            Ok(()) => {
                debug!(
                    "{} credential of {} revoked by {}",
                    link.required_role, link.holder, list.issuer
                );
                Ok(Some(ErrorKind::IssuerCredentialRevoked))
            }
            Err(reason) => Ok(Some(reason)),
        }
    }
}
