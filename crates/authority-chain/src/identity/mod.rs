//! Identities, DID documents and issuer key material.
//!
//! An [`Identity`] is a DID-like string compared by its address component,
//! so `did:ethr:volta:0xAbC` and `0xabc` name the same party.

pub mod did;
pub mod key;
pub mod resolver;

pub use did::{DidDocument, Identity, ServiceEndpoint, VerificationMethod, CREDENTIAL_SERVICE_TYPE};
pub use key::IssuerKey;
pub use resolver::{DidResolver, InMemoryDidResolver};
