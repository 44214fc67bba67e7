//! Role authority lookup collaborator.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;

use super::spec::RoleAuthority;

/// Resolves the current issuer/revoker rules of a role namespace.
///
/// Must be idempotent and side-effect free. `Ok(None)` means the role is
/// not defined; `Err` means the backing state could not be read.
#[async_trait]
pub trait RoleAuthorityLookup: Send + Sync {
    async fn get(&self, namespace: &str) -> Result<Option<RoleAuthority>>;
}

/// Role definitions held in process memory.
#[derive(Default)]
pub struct InMemoryRoleAuthorities {
    roles: RwLock<HashMap<String, RoleAuthority>>,
}

impl InMemoryRoleAuthorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a role.
    pub fn define(&self, namespace: impl Into<String>, authority: RoleAuthority) {
        self.roles
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(namespace.into(), authority);
    }

    /// Remove a role definition, returning it if present.
    pub fn remove(&self, namespace: &str) -> Option<RoleAuthority> {
        self.roles
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(namespace)
    }
}

#[async_trait]
impl RoleAuthorityLookup for InMemoryRoleAuthorities {
    async fn get(&self, namespace: &str) -> Result<Option<RoleAuthority>> {
        Ok(self
            .roles
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(namespace)
            .cloned())
    }
}
