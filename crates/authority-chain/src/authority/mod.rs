//! Role authority definitions and the lookups that resolve them.
//!
//! Each role namespace names two rules: who may issue credentials for the
//! role and who may revoke them. A rule is either an explicit identity
//! allow-list or "must hold another role".

pub mod definition;
pub mod lookup;
pub mod spec;

pub use definition::{AuthoritySide, DefinitionAuthorityLookup, RoleDefinitionSource};
pub use lookup::{InMemoryRoleAuthorities, RoleAuthorityLookup};
pub use spec::{AuthoritySpec, RoleAuthority};
