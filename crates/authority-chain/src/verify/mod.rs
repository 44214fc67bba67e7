//! Chain-of-trust verification.
//!
//! - [`engine`] — [`AuthorityChainVerifier`] and its four entry points.
//! - [`walk`] — the `ByRole` chain walk shared by issuer and revocation checks.
//! - [`format`] — proof checking per credential format.
//! - [`result`] — [`VerificationResult`], [`IssuanceOutcome`] and [`ErrorKind`].

mod checks;
pub mod engine;
pub mod format;
pub mod result;
pub mod walk;

pub use engine::{AuthorityChainVerifier, VerifierBuilder};
pub use format::{ClaimFormatVerifier, FormatVerifier, VcFormatVerifier};
pub use result::{ErrorKind, IssuanceOutcome, VerificationResult};
pub use walk::{ChainLink, ChainWalk, HopCheck};
