//! authority-chain — chain-of-trust verification for role credentials.
//!
//! Decides whether the issuer (or revoker) of a role credential was itself
//! authorized, either directly through an identity allow-list or through a
//! credential for another role that traces back to one, and whether any
//! credential along that chain has since expired or been revoked.
//!
//! Role definitions, credentials, DID documents and status lists are read
//! through async collaborator traits; in-memory and file-backed
//! implementations are provided.

pub mod authority;
pub mod cache;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod proof;
pub mod session;
pub mod status;
pub mod storage;
pub mod time;
pub mod verify;

// Re-export primary types
pub use authority::{AuthoritySpec, RoleAuthority, RoleAuthorityLookup};
pub use cache::{CacheStats, ResolutionCache};
pub use config::VerifierConfig;
pub use credential::{Credential, CredentialFormat, CredentialStore, RoleCredentialBuilder};
pub use error::{AuthorityError, Result};
pub use identity::{DidDocument, DidResolver, Identity, IssuerKey};
pub use session::VerificationSession;
pub use status::{EntryStatus, StatusListChecker};
pub use storage::FileRoleRegistry;
pub use verify::{AuthorityChainVerifier, ErrorKind, IssuanceOutcome, VerificationResult};
