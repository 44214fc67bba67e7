//! Role authorities assembled from raw role definition fields.
//!
//! On-chain role definitions store the issuer and revoker rules as loose
//! fields: a type tag (`DID` or `ROLE`), a DID list and a role name. The
//! fields are independent reads, so they are fetched concurrently and then
//! folded into a [`RoleAuthority`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::Identity;

use super::lookup::RoleAuthorityLookup;
use super::spec::{AuthoritySpec, RoleAuthority};

/// Which rule of a role definition is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoritySide {
    Issuer,
    Revoker,
}

/// Raw read access to role definitions (e.g. a role registry contract).
#[async_trait]
pub trait RoleDefinitionSource: Send + Sync {
    /// Whether a definition is registered for the namespace.
    async fn exists(&self, namespace: &str) -> Result<bool>;

    /// Type tag of one side: `"DID"`, `"ROLE"` or anything else.
    async fn authority_type(&self, namespace: &str, side: AuthoritySide) -> Result<Option<String>>;

    /// DID list of one side. Empty when the side is role-based.
    async fn authority_dids(&self, namespace: &str, side: AuthoritySide) -> Result<Vec<String>>;

    /// Role namespace of one side. `None` when the side is DID-based.
    async fn authority_role(&self, namespace: &str, side: AuthoritySide) -> Result<Option<String>>;
}

/// [`RoleAuthorityLookup`] over a [`RoleDefinitionSource`].
pub struct DefinitionAuthorityLookup {
    source: Arc<dyn RoleDefinitionSource>,
}

impl DefinitionAuthorityLookup {
    pub fn new(source: Arc<dyn RoleDefinitionSource>) -> Self {
        Self { source }
    }

    async fn read_side(&self, namespace: &str, side: AuthoritySide) -> Result<Option<AuthoritySpec>> {
        let (kind, dids, role) = tokio::join!(
            self.source.authority_type(namespace, side),
            self.source.authority_dids(namespace, side),
            self.source.authority_role(namespace, side),
        );
        Ok(spec_from_parts(kind?.as_deref(), dids?, role?))
    }
}

#[async_trait]
impl RoleAuthorityLookup for DefinitionAuthorityLookup {
    async fn get(&self, namespace: &str) -> Result<Option<RoleAuthority>> {
        if !self.source.exists(namespace).await? {
            return Ok(None);
        }
        let (issuer, revoker) = tokio::join!(
            self.read_side(namespace, AuthoritySide::Issuer),
            self.read_side(namespace, AuthoritySide::Revoker),
        );
        Ok(Some(RoleAuthority {
            issuer: issuer?,
            revoker: revoker?,
        }))
    }
}

/// Fold raw fields into a rule. An unknown type tag, or a `ROLE` tag with
/// no role name, yields `None`.
pub fn spec_from_parts(
    kind: Option<&str>,
    dids: Vec<String>,
    role: Option<String>,
) -> Option<AuthoritySpec> {
    match kind.map(str::trim) {
        Some(k) if k.eq_ignore_ascii_case("DID") => Some(AuthoritySpec::ByIdentityList {
            identities: dids.into_iter().map(Identity::from).collect(),
        }),
        Some(k) if k.eq_ignore_ascii_case("ROLE") => role
            .filter(|r| !r.trim().is_empty())
            .map(|role_namespace| AuthoritySpec::ByRole { role_namespace }),
        _ => None,
    }
}
