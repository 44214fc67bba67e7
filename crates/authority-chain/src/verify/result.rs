//! Verification outcomes.

use serde::{Deserialize, Serialize};

use crate::credential::Credential;

/// Why a verification failed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum ErrorKind {
    #[error("no issuer authority is defined for the role")]
    NoIssuers,

    #[error("no revoker authority is defined for the role")]
    NoRevokers,

    #[error("the identity holds no credential for the required role")]
    NoCredential,

    #[error("credential proof did not verify")]
    InvalidCredentialProof,

    #[error("issuer authority is neither an identity list nor a role")]
    InvalidIssuerType,

    #[error("revoker authority is neither an identity list nor a role")]
    InvalidRevokerType,

    #[error("issuer is not in the role's issuer list")]
    IssuerNotAuthorized,

    #[error("revoker is not in the role's revoker list")]
    RevokerNotAuthorized,

    #[error("a credential in the issuer chain has expired")]
    IssuerCredentialExpired,

    #[error("a credential in the issuer chain has been revoked")]
    IssuerCredentialRevoked,

    #[error("role authorities form a cycle")]
    AuthorityCycleDetected,

    #[error("issuer chain mixes verifiable credentials and signed claims")]
    MixedFormatChainUnsupported,

    #[error("issuer chain is longer than the configured maximum")]
    ChainDepthExceeded,
}

/// Outcome of `verify_issuer`, `verify_revoker` or `check_revocation_status`.
///
/// `reason` is set exactly when `verified` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
}

impl VerificationResult {
    pub fn verified() -> Self {
        Self {
            verified: true,
            reason: None,
        }
    }

    pub fn failed(reason: ErrorKind) -> Self {
        Self {
            verified: false,
            reason: Some(reason),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// `Ok(())` when verified, the reason otherwise.
    pub fn into_result(self) -> std::result::Result<(), ErrorKind> {
        match self.reason {
            Some(reason) if !self.verified => Err(reason),
            _ => Ok(()),
        }
    }
}

impl From<std::result::Result<(), ErrorKind>> for VerificationResult {
    fn from(result: std::result::Result<(), ErrorKind>) -> Self {
        match result {
            Ok(()) => Self::verified(),
            Err(reason) => Self::failed(reason),
        }
    }
}

/// Outcome of `verify_issuance`.
#[derive(Debug, Clone, PartialEq)]
pub enum IssuanceOutcome {
    /// The credential exists and its proof holds. Returned unchanged.
    Verified(Credential),
    Rejected(ErrorKind),
}

impl IssuanceOutcome {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Verified(credential) => Some(credential),
            Self::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> Option<ErrorKind> {
        match self {
            Self::Verified(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> std::result::Result<Credential, ErrorKind> {
        match self {
            Self::Verified(credential) => Ok(credential),
            Self::Rejected(reason) => Err(reason),
        }
    }
}
