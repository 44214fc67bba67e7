//! Compact signed claim tokens.
//!
//! A signed claim is a three-segment JWS (`header.payload.signature`, each
//! base64url without padding). The payload names the issuer (`iss`), the
//! subject (`sub`), the claimed role (`claimData.claimType`) and optionally
//! an expiry (`exp`, Unix seconds) and a status list entry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{AuthorityError, Result};
use crate::identity::Identity;

use super::model::StatusListEntry;

/// JWS algorithm accepted for claim tokens.
pub const CLAIM_ALG: &str = "EdDSA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Verification method id of the signing key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimData {
    #[serde(rename = "claimType")]
    pub claim_type: String,
    #[serde(rename = "claimTypeVersion")]
    pub claim_type_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayload {
    pub iss: Identity,
    pub sub: Identity,
    #[serde(rename = "claimData")]
    pub claim_data: ClaimData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_status: Option<StatusListEntry>,
}

/// A parsed claim token. The original token text is kept verbatim since
/// the signature covers its exact bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignedClaim {
    token: String,
    header: ClaimHeader,
    payload: ClaimPayload,
}

impl SignedClaim {
    /// Decode a compact token. The signature is not checked here.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let mut parts = token.split('.');
        let (h, p, s) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => {
                return Err(AuthorityError::MalformedCredential(
                    "claim token must have three segments".into(),
                ))
            }
        };
        if s.is_empty() {
            return Err(AuthorityError::MalformedCredential(
                "claim token has no signature".into(),
            ));
        }

        Ok(Self {
            header: decode_segment(h, "header")?,
            payload: decode_segment(p, "payload")?,
            token: token.to_string(),
        })
    }

    /// Assemble and sign a token with `sign`, which receives the JWS signing
    /// input and returns the base64url signature.
    pub fn assemble(
        header: &ClaimHeader,
        payload: &ClaimPayload,
        sign: impl FnOnce(&[u8]) -> String,
    ) -> Result<Self> {
        let h = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header)?);
        let p = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload)?);
        let signing_input = format!("{h}.{p}");
        let signature = sign(signing_input.as_bytes());
        Self::parse(&format!("{signing_input}.{signature}"))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn header(&self) -> &ClaimHeader {
        &self.header
    }

    pub fn payload(&self) -> &ClaimPayload {
        &self.payload
    }

    /// `header.payload`, the bytes the signature covers.
    pub fn signing_input(&self) -> &str {
        match self.token.rfind('.') {
            Some(idx) => &self.token[..idx],
            None => &self.token,
        }
    }

    /// The base64url signature segment.
    pub fn signature(&self) -> &str {
        match self.token.rfind('.') {
            Some(idx) => &self.token[idx + 1..],
            None => "",
        }
    }
}

impl TryFrom<String> for SignedClaim {
    type Error = AuthorityError;

    fn try_from(token: String) -> Result<Self> {
        Self::parse(&token)
    }
}

impl From<SignedClaim> for String {
    fn from(claim: SignedClaim) -> Self {
        claim.token
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str, what: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment.as_bytes()).map_err(|e| {
        AuthorityError::MalformedCredential(format!("claim {what} is not base64url: {e}"))
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthorityError::MalformedCredential(format!("claim {what} is not valid: {e}")))
}
