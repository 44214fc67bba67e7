//! Revocation status lists.
//!
//! A credential that can be revoked carries a [`StatusListEntry`] pointing
//! at an index of a published status list. The list is itself a signed VC
//! whose subject holds a base64 bitstring; a set bit means revoked. The
//! list's issuer is the party that revoked, so the engine checks that issuer
//! against the role's revoker authority before trusting a revocation.

pub mod bitstring;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::issue::{sign_proof, ASSERTION_METHOD};
use crate::credential::model::{StatusListEntry, VerifiableCredential, VC_CONTEXT};
use crate::error::{AuthorityError, Result};
use crate::identity::IssuerKey;

pub use bitstring::StatusBitstring;

/// Status of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    Revoked,
}

/// `credentialSubject` of a status list credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusListSubject {
    pub id: String,
    #[serde(rename = "type")]
    pub subject_type: String,
    #[serde(rename = "statusPurpose")]
    pub status_purpose: String,
    #[serde(rename = "encodedList")]
    pub encoded_list: String,
}

/// A published status list.
pub type StatusListCredential = VerifiableCredential<StatusListSubject>;

/// Reads status lists.
#[async_trait]
pub trait StatusListChecker: Send + Sync {
    /// Current status of the entry.
    async fn verify(&self, entry: &StatusListEntry) -> Result<EntryStatus>;

    /// The status list credential published at `status_list_uri`.
    async fn fetch(&self, status_list_uri: &str) -> Result<StatusListCredential>;
}

/// Look up `entry` in an already fetched list.
pub fn entry_status(list: &StatusListCredential, entry: &StatusListEntry) -> Result<EntryStatus> {
    let subject = &list.credential_subject;
    if subject.status_purpose != entry.status_purpose {
        return Err(AuthorityError::StatusList(format!(
            "entry purpose {} does not match list purpose {}",
            entry.status_purpose, subject.status_purpose
        )));
    }
    let bits = StatusBitstring::decode(&subject.encoded_list)?;
    let revoked = bits.get(entry.index()?).ok_or_else(|| {
        AuthorityError::StatusList(format!(
            "index {} outside list {} of {} entries",
            entry.status_list_index,
            entry.status_list_credential,
            bits.len()
        ))
    })?;
    Ok(if revoked {
        EntryStatus::Revoked
    } else {
        EntryStatus::Active
    })
}

/// Sign a status list credential published at `list_uri`.
pub fn issue_status_list(
    issuer: &IssuerKey,
    list_uri: &str,
    bits: &StatusBitstring,
    issued_at: DateTime<Utc>,
) -> Result<StatusListCredential> {
    let mut list = VerifiableCredential {
        context: vec![VC_CONTEXT.to_string()],
        id: Some(list_uri.to_string()),
        types: vec![
            "VerifiableCredential".to_string(),
            "StatusList2021Credential".to_string(),
        ],
        issuer: issuer.did(),
        issuance_date: crate::time::to_rfc3339(&issued_at),
        expiration_date: None,
        credential_subject: StatusListSubject {
            id: format!("{list_uri}#list"),
            subject_type: "StatusList2021".to_string(),
            status_purpose: "revocation".to_string(),
            encoded_list: bits.encode(),
        },
        credential_status: None,
        proof: None,
    };
    list.proof = Some(sign_proof(
        &list.signing_payload()?,
        issuer,
        ASSERTION_METHOD,
        issued_at,
    ));
    Ok(list)
}

/// Status lists held in process memory, keyed by URI.
#[derive(Default)]
pub struct InMemoryStatusLists {
    lists: RwLock<HashMap<String, StatusListCredential>>,
}

impl InMemoryStatusLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace the list at `list_uri`.
    pub fn publish(&self, list_uri: impl Into<String>, list: StatusListCredential) {
        self.lists
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(list_uri.into(), list);
    }
}

#[async_trait]
impl StatusListChecker for InMemoryStatusLists {
    async fn verify(&self, entry: &StatusListEntry) -> Result<EntryStatus> {
        let list = self.fetch(&entry.status_list_credential).await?;
        entry_status(&list, entry)
    }

    async fn fetch(&self, status_list_uri: &str) -> Result<StatusListCredential> {
        self.lists
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(status_list_uri)
            .cloned()
            .ok_or_else(|| AuthorityError::StatusList(format!("no status list at {status_list_uri}")))
    }
}
