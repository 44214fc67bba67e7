//! Role credentials in their two wire encodings.
//!
//! A role credential asserts that a subject holds a role namespace. It
//! arrives either as a W3C Verifiable Credential with an embedded proof or
//! as a compact signed claim token. [`Credential`] is the tagged union the
//! rest of the crate works with; the variant is decided once, when the raw
//! JSON is parsed at the store boundary.

pub mod claim;
pub mod envelope;
pub mod issue;
pub mod model;
pub mod store;

pub use claim::{ClaimData, ClaimHeader, ClaimPayload, SignedClaim};
pub use envelope::{Credential, CredentialFormat};
pub use issue::RoleCredentialBuilder;
pub use model::{
    Proof, RoleClaim, RoleCredential, RoleSubject, StatusListEntry, VerifiableCredential,
};
pub use store::{
    BlobStore, CredentialStore, DidServiceCredentialStore, InMemoryBlobStore,
    InMemoryCredentialStore,
};
