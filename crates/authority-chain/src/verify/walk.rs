//! The authority chain walk.
//!
//! Starting from `(holder, namespace)`, each step resolves the namespace's
//! issuer authority. A `ByIdentityList` authority is a root of trust and ends
//! the walk. A `ByRole { R }` authority means `holder` must hold a credential
//! for `R`; the walk fetches it, hands it to the [`HopCheck`], then moves to
//! `(credential.issuer, R)`.
//!
//! Issuer verification and revocation checking differ only in what they do
//! at a link and at the root, so both run on this walk. The walk owns every
//! traversal guard:
//!
//! - a namespace seen twice in one walk is `AuthorityCycleDetected`;
//! - more than `max_depth` `ByRole` hops is `ChainDepthExceeded`;
//! - the first credential fixes the chain's format, and a later credential
//!   in the other format is `MixedFormatChainUnsupported`.
//!
//! Before fetching any credential the walk follows the `ByRole` pointers
//! alone, so a cyclic role graph is reported even when nobody holds the
//! roles involved.

use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;

use crate::authority::{AuthoritySpec, RoleAuthorityLookup};
use crate::credential::{Credential, CredentialFormat, CredentialStore};
use crate::error::Result;
use crate::identity::Identity;
use crate::session::VerificationSession;

use super::result::{ErrorKind, VerificationResult};

/// One `ByRole` hop: `holder` needed `required_role` to act for `namespace`,
/// and presented `credential`.
#[derive(Debug)]
pub struct ChainLink<'a> {
    pub namespace: &'a str,
    pub holder: &'a Identity,
    pub required_role: &'a str,
    pub credential: &'a Credential,
    /// 1 for the first hop.
    pub depth: usize,
}

/// What a walk checks at each hop.
#[async_trait]
pub trait HopCheck: Send + Sync {
    /// The walk reached an identity-list root while `holder` was acting.
    async fn at_root(
        &self,
        holder: &Identity,
        identities: &[Identity],
        session: &VerificationSession,
    ) -> Result<VerificationResult>;

    /// Inspect a link. `Some` stops the walk with that failure.
    async fn at_link(
        &self,
        link: &ChainLink<'_>,
        session: &VerificationSession,
    ) -> Result<Option<ErrorKind>>;
}

pub struct ChainWalk<'a> {
    authorities: &'a dyn RoleAuthorityLookup,
    credentials: &'a dyn CredentialStore,
    max_depth: usize,
    format: Option<CredentialFormat>,
}

impl<'a> ChainWalk<'a> {
    pub fn new(
        authorities: &'a dyn RoleAuthorityLookup,
        credentials: &'a dyn CredentialStore,
        max_depth: usize,
    ) -> Self {
        Self {
            authorities,
            credentials,
            max_depth,
            format: None,
        }
    }

    /// Require every credential on the chain to be in `format`.
    pub fn pinned(mut self, format: Option<CredentialFormat>) -> Self {
        self.format = format;
        self
    }

    pub async fn run(
        &self,
        start: &Identity,
        namespace: &str,
        check: &dyn HopCheck,
        session: &VerificationSession,
    ) -> Result<VerificationResult> {
        if let Some(reason) = self.probe(namespace, session).await? {
            debug!("role graph above {namespace} rejected: {reason}");
            return Ok(VerificationResult::failed(reason));
        }

        let mut visited = HashSet::new();
        let mut holder = start.clone();
        let mut namespace = namespace.to_string();
        let mut format = self.format;
        let mut depth = 0;

        loop {
            if !visited.insert(namespace.clone()) {
                return Ok(VerificationResult::failed(ErrorKind::AuthorityCycleDetected));
            }
            let Some(authority) = session.role_authority(self.authorities, &namespace).await?
            else {
                debug!("{namespace}: role undefined");
                return Ok(VerificationResult::failed(ErrorKind::NoIssuers));
            };

            let role = match authority.issuer {
                None => return Ok(VerificationResult::failed(ErrorKind::InvalidIssuerType)),
                Some(AuthoritySpec::ByIdentityList { identities }) => {
                    debug!("{namespace}: root reached with {holder}");
                    return check.at_root(&holder, &identities, session).await;
                }
                Some(AuthoritySpec::ByRole { role_namespace }) => role_namespace,
            };

            depth += 1;
            if depth > self.max_depth {
                return Ok(VerificationResult::failed(ErrorKind::ChainDepthExceeded));
            }
            debug!("{namespace}: {holder} must hold {role} (hop {depth})");

            let Some(credential) = session.credential(self.credentials, &holder, &role).await?
            else {
                return Ok(VerificationResult::failed(ErrorKind::NoCredential));
            };
            match format {
                None => format = Some(credential.format()),
                Some(pinned) if pinned != credential.format() => {
                    debug!("{namespace}: {holder} presented a {}", credential.format());
                    return Ok(VerificationResult::failed(
                        ErrorKind::MixedFormatChainUnsupported,
                    ));
                }
                Some(_) => {}
            }

            let link = ChainLink {
                namespace: &namespace,
                holder: &holder,
                required_role: &role,
                credential: &credential,
                depth,
            };
            if let Some(reason) = check.at_link(&link, session).await? {
                debug!("{namespace}: link rejected: {reason}");
                return Ok(VerificationResult::failed(reason));
            }

            holder = credential.issuer().clone();
            namespace = role;
        }
    }

    /// Follow `ByRole` pointers from `namespace` without touching credentials.
    async fn probe(
        &self,
        namespace: &str,
        session: &VerificationSession,
    ) -> Result<Option<ErrorKind>> {
        let mut visited = HashSet::new();
        let mut namespace = namespace.to_string();
        let mut depth = 0;

        loop {
            if !visited.insert(namespace.clone()) {
                return Ok(Some(ErrorKind::AuthorityCycleDetected));
            }
            let issuer = session
                .role_authority(self.authorities, &namespace)
                .await?
                .and_then(|authority| authority.issuer);
            match issuer {
                Some(AuthoritySpec::ByRole { role_namespace }) => {
                    depth += 1;
                    if depth > self.max_depth {
                        return Ok(Some(ErrorKind::ChainDepthExceeded));
                    }
                    namespace = role_namespace;
                }
                _ => return Ok(None),
            }
        }
    }
}
