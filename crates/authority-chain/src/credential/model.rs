//! Verifiable Credential envelope and the fields the verifier reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthorityError, Result};
use crate::identity::Identity;

/// W3C credentials context.
pub const VC_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Proof type produced and accepted for VC proofs.
pub const ED25519_PROOF_TYPE: &str = "Ed25519Signature2018";

/// Pointer into a published status list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusListEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(rename = "statusPurpose")]
    pub status_purpose: String,
    /// Decimal index, serialized as a string per StatusList2021.
    #[serde(rename = "statusListIndex")]
    pub status_list_index: String,
    #[serde(rename = "statusListCredential")]
    pub status_list_credential: String,
}

impl StatusListEntry {
    /// A revocation entry at `index` of the list published at `list_uri`.
    pub fn revocation(list_uri: impl Into<String>, index: usize) -> Self {
        let list_uri = list_uri.into();
        Self {
            id: format!("{list_uri}#{index}"),
            entry_type: "StatusList2021Entry".to_string(),
            status_purpose: "revocation".to_string(),
            status_list_index: index.to_string(),
            status_list_credential: list_uri,
        }
    }

    pub fn index(&self) -> Result<usize> {
        self.status_list_index.trim().parse().map_err(|_| {
            AuthorityError::MalformedCredential(format!(
                "status list index is not a number: {:?}",
                self.status_list_index
            ))
        })
    }
}

/// Embedded linked-data proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub created: String,
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: String,
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
    #[serde(rename = "proofValue")]
    pub proof_value: String,
}

/// Role asserted by a role credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaim {
    pub namespace: String,
    pub version: String,
}

/// `credentialSubject` of a role credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSubject {
    pub id: Identity,
    pub role: RoleClaim,
}

/// A Verifiable Credential with subject type `S`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiableCredential<S> {
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub issuer: Identity,
    #[serde(rename = "issuanceDate")]
    pub issuance_date: String,
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<String>,
    #[serde(rename = "credentialSubject")]
    pub credential_subject: S,
    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_status: Option<StatusListEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// The VC variant of a role credential.
pub type RoleCredential = VerifiableCredential<RoleSubject>;

impl<S: Serialize> VerifiableCredential<S> {
    /// Bytes covered by the proof: the credential without `proof`, as
    /// JSON with lexicographically sorted keys.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        signing_payload_of(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Signing payload of an arbitrary VC document.
///
/// `serde_json::Map` keeps keys sorted, so re-serializing a parsed document
/// reproduces the bytes the issuer signed.
pub fn signing_payload_of(mut document: Value) -> Result<Vec<u8>> {
    match document.as_object_mut() {
        Some(map) => {
            map.remove("proof");
        }
        None => {
            return Err(AuthorityError::MalformedCredential(
                "credential is not a JSON object".into(),
            ))
        }
    }
    Ok(serde_json::to_vec(&document)?)
}
