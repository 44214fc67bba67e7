//! The [`Credential`] union and structural classification of raw credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AuthorityError, Result};
use crate::identity::Identity;

use super::claim::SignedClaim;
use super::model::{RoleCredential, StatusListEntry};

/// Which proof mechanism a credential uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFormat {
    Vc,
    Claim,
}

impl std::fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vc => write!(f, "verifiable credential"),
            Self::Claim => write!(f, "signed claim"),
        }
    }
}

/// A role credential in either wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Credential {
    Vc(RoleCredential),
    Claim(SignedClaim),
}

impl Credential {
    /// Classify and parse a raw credential document.
    ///
    /// - an object with `credentialSubject` and `proof` is a VC;
    /// - a compact three-segment string, or an object with a `token`
    ///   string, is a signed claim.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::String(token) => Ok(Self::Claim(SignedClaim::parse(&token)?)),
            Value::Object(map) => {
                if let Some(token) = map.get("token").and_then(Value::as_str) {
                    return Ok(Self::Claim(SignedClaim::parse(token)?));
                }
                if !map.contains_key("credentialSubject") {
                    return Err(AuthorityError::MalformedCredential(
                        "unrecognized credential envelope".into(),
                    ));
                }
                if !map.get("proof").is_some_and(Value::is_object) {
                    return Err(AuthorityError::MalformedCredential(
                        "verifiable credential has no proof".into(),
                    ));
                }
                serde_json::from_value(Value::Object(map))
                    .map(Self::Vc)
                    .map_err(|e| AuthorityError::MalformedCredential(e.to_string()))
            }
            _ => Err(AuthorityError::MalformedCredential(
                "credential must be a JSON object or token string".into(),
            )),
        }
    }

    /// Parse a credential from its serialized text (JSON document, or a bare token).
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_json(value),
            Err(_) => Ok(Self::Claim(SignedClaim::parse(trimmed)?)),
        }
    }

    pub fn format(&self) -> CredentialFormat {
        match self {
            Self::Vc(_) => CredentialFormat::Vc,
            Self::Claim(_) => CredentialFormat::Claim,
        }
    }

    pub fn issuer(&self) -> &Identity {
        match self {
            Self::Vc(vc) => &vc.issuer,
            Self::Claim(claim) => &claim.payload().iss,
        }
    }

    pub fn subject(&self) -> &Identity {
        match self {
            Self::Vc(vc) => &vc.credential_subject.id,
            Self::Claim(claim) => &claim.payload().sub,
        }
    }

    pub fn role_namespace(&self) -> &str {
        match self {
            Self::Vc(vc) => &vc.credential_subject.role.namespace,
            Self::Claim(claim) => &claim.payload().claim_data.claim_type,
        }
    }

    pub fn role_version(&self) -> &str {
        match self {
            Self::Vc(vc) => &vc.credential_subject.role.version,
            Self::Claim(claim) => &claim.payload().claim_data.claim_type_version,
        }
    }

    pub fn status(&self) -> Option<&StatusListEntry> {
        match self {
            Self::Vc(vc) => vc.credential_status.as_ref(),
            Self::Claim(claim) => claim.payload().credential_status.as_ref(),
        }
    }

    /// Expiry instant, from `expirationDate` (VC) or `exp` (claim).
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>> {
        match self {
            Self::Vc(vc) => vc
                .expiration_date
                .as_deref()
                .map(crate::time::parse_rfc3339)
                .transpose(),
            Self::Claim(claim) => claim
                .payload()
                .exp
                .map(crate::time::from_unix_seconds)
                .transpose(),
        }
    }

    /// True when the credential carries an expiry strictly before `now`.
    pub fn is_expired_at(&self, now: &DateTime<Utc>) -> Result<bool> {
        Ok(self.expires_at()?.is_some_and(|exp| exp < *now))
    }

    /// The form handed to proof verifiers: VC JSON, or the raw token.
    pub fn serialized(&self) -> Result<String> {
        match self {
            Self::Vc(vc) => vc.to_json_string(),
            Self::Claim(claim) => Ok(claim.token().to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}
