//! Authority rules attached to a role namespace.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Rule deciding who may issue (or revoke) credentials for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthoritySpec {
    /// Only the listed identities. This is a root of trust.
    #[serde(rename = "DID")]
    ByIdentityList { identities: Vec<Identity> },
    /// Any holder of a valid credential for another role.
    #[serde(rename = "ROLE")]
    ByRole {
        #[serde(rename = "roleNamespace")]
        role_namespace: String,
    },
}

impl AuthoritySpec {
    pub fn identities<I, T>(identities: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identity>,
    {
        Self::ByIdentityList {
            identities: identities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn role(role_namespace: impl Into<String>) -> Self {
        Self::ByRole {
            role_namespace: role_namespace.into(),
        }
    }

    /// Membership test for allow-list rules. Always false for role rules.
    pub fn lists(&self, identity: &Identity) -> bool {
        match self {
            Self::ByIdentityList { identities } => identities.iter().any(|i| i == identity),
            Self::ByRole { .. } => false,
        }
    }
}

/// Issuer and revoker rules of one role namespace.
///
/// A side that is `None` has no usable definition (neither an identity list
/// nor a role was configured); verification reports it as an invalid
/// issuer or revoker type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAuthority {
    #[serde(default)]
    pub issuer: Option<AuthoritySpec>,
    #[serde(default)]
    pub revoker: Option<AuthoritySpec>,
}

impl RoleAuthority {
    pub fn new(issuer: AuthoritySpec, revoker: AuthoritySpec) -> Self {
        Self {
            issuer: Some(issuer),
            revoker: Some(revoker),
        }
    }

    /// Same rule for issuing and revoking.
    pub fn symmetric(spec: AuthoritySpec) -> Self {
        Self::new(spec.clone(), spec)
    }
}
