//! Directory-backed role registry.
//!
//! Stores role definitions, credentials, DID documents and status lists as
//! versioned JSON files:
//!
//! ```text
//! {base_dir}/
//! ├── roles/            — one file per role namespace
//! │   └── {namespace}.json
//! ├── credentials/      — credentials grouped by subject address
//! │   └── {address}/
//! │       └── {namespace}.json
//! ├── dids/             — DID documents
//! │   └── {address}.json
//! └── status-lists/     — status lists, named by SHA-256 of their URI
//!     └── {hash}.json
//! ```
//!
//! Every file wraps its payload with a format version:
//! ```json
//! { "version": 1, "role": { "namespace": "...", "authority": { ... } } }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::authority::{RoleAuthority, RoleAuthorityLookup};
use crate::credential::{Credential, CredentialStore, StatusListEntry};
use crate::error::{AuthorityError, Result};
use crate::identity::{DidDocument, DidResolver, Identity};
use crate::status::{entry_status, EntryStatus, StatusListChecker, StatusListCredential};

const REGISTRY_FILE_VERSION: u32 = 1;

const ROLES_DIR: &str = "roles";
const CREDENTIALS_DIR: &str = "credentials";
const DIDS_DIR: &str = "dids";
const STATUS_LISTS_DIR: &str = "status-lists";

// ── On-disk structures ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct RoleRecord {
    namespace: String,
    authority: RoleAuthority,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatusListRecord {
    uri: String,
    list: StatusListCredential,
}

#[derive(Debug, Serialize, Deserialize)]
struct Versioned<T> {
    version: u32,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoleFile {
    role: RoleRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    credential: Credential,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    document: DidDocument,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatusListFile {
    status_list: StatusListRecord,
}

// ── FileRoleRegistry ──────────────────────────────────────────────────────────

/// Filesystem-backed role registry. Implements every lookup collaborator the
/// verifier needs, so a single directory can drive the CLI.
pub struct FileRoleRegistry {
    base_dir: PathBuf,
}

impl FileRoleRegistry {
    /// Open (creating if needed) a registry rooted at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AuthorityError::Io` if a sub-directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        for dir in [ROLES_DIR, CREDENTIALS_DIR, DIDS_DIR, STATUS_LISTS_DIR] {
            std::fs::create_dir_all(base_dir.join(dir))?;
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // ── Roles ────────────────────────────────────────────────────────────────

    pub fn save_role(&self, namespace: &str, authority: &RoleAuthority) -> Result<()> {
        let path = self.role_path(namespace)?;
        write_versioned(
            &path,
            RoleFile {
                role: RoleRecord {
                    namespace: namespace.to_string(),
                    authority: authority.clone(),
                },
            },
        )
    }

    pub fn load_role(&self, namespace: &str) -> Result<Option<RoleAuthority>> {
        let path = self.role_path(namespace)?;
        if !path.exists() {
            return Ok(None);
        }
        let file: RoleFile = read_versioned(&path)?;
        Ok(Some(file.role.authority))
    }

    /// Namespaces of all stored roles, sorted.
    pub fn list_roles(&self) -> Result<Vec<String>> {
        let mut namespaces = Vec::new();
        for path in json_files(&self.base_dir.join(ROLES_DIR))? {
            let file: RoleFile = read_versioned(&path)?;
            namespaces.push(file.role.namespace);
        }
        namespaces.sort();
        Ok(namespaces)
    }

    /// Returns `true` if a definition was removed.
    pub fn remove_role(&self, namespace: &str) -> Result<bool> {
        let path = self.role_path(namespace)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    // ── Credentials ──────────────────────────────────────────────────────────

    /// Store a credential under its subject. Replaces any credential the
    /// subject already holds for the same namespace.
    pub fn save_credential(&self, credential: &Credential) -> Result<PathBuf> {
        let path = self
            .credentials_dir(credential.subject())?
            .join(format!("{}.json", file_stem(credential.role_namespace())?));
        write_versioned(
            &path,
            CredentialFile {
                credential: credential.clone(),
            },
        )?;
        Ok(path)
    }

    /// All credentials of `subject`, ordered by namespace.
    pub fn credentials_of(&self, subject: &Identity) -> Result<Vec<Credential>> {
        let dir = self.credentials_dir(subject)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        json_files(&dir)?
            .iter()
            .map(|path| read_versioned::<CredentialFile>(path).map(|file| file.credential))
            .collect()
    }

    // ── DID documents ────────────────────────────────────────────────────────

    pub fn save_document(&self, document: &DidDocument) -> Result<()> {
        write_versioned(
            &self.document_path(&document.id)?,
            DocumentFile {
                document: document.clone(),
            },
        )
    }

    pub fn load_document(&self, identity: &Identity) -> Result<DidDocument> {
        let path = self.document_path(identity)?;
        if !path.exists() {
            return Err(AuthorityError::DidResolution(format!(
                "no document stored for {identity}"
            )));
        }
        let file: DocumentFile = read_versioned(&path)?;
        Ok(file.document)
    }

    // ── Status lists ─────────────────────────────────────────────────────────

    pub fn save_status_list(&self, uri: &str, list: &StatusListCredential) -> Result<()> {
        write_versioned(
            &self.status_list_path(uri),
            StatusListFile {
                status_list: StatusListRecord {
                    uri: uri.to_string(),
                    list: list.clone(),
                },
            },
        )
    }

    pub fn load_status_list(&self, uri: &str) -> Result<StatusListCredential> {
        let path = self.status_list_path(uri);
        if !path.exists() {
            return Err(AuthorityError::StatusList(format!("no status list at {uri}")));
        }
        let file: StatusListFile = read_versioned(&path)?;
        Ok(file.status_list.list)
    }

    // ── Paths ────────────────────────────────────────────────────────────────

    fn role_path(&self, namespace: &str) -> Result<PathBuf> {
        Ok(self
            .base_dir
            .join(ROLES_DIR)
            .join(format!("{}.json", file_stem(namespace)?)))
    }

    fn credentials_dir(&self, subject: &Identity) -> Result<PathBuf> {
        Ok(self
            .base_dir
            .join(CREDENTIALS_DIR)
            .join(address_stem(subject)?))
    }

    fn document_path(&self, identity: &Identity) -> Result<PathBuf> {
        Ok(self
            .base_dir
            .join(DIDS_DIR)
            .join(format!("{}.json", address_stem(identity)?)))
    }

    fn status_list_path(&self, uri: &str) -> PathBuf {
        let hash = hex::encode(Sha256::digest(uri.as_bytes()));
        self.base_dir
            .join(STATUS_LISTS_DIR)
            .join(format!("{hash}.json"))
    }
}

// ── Collaborator impls ────────────────────────────────────────────────────────

#[async_trait]
impl RoleAuthorityLookup for FileRoleRegistry {
    async fn get(&self, namespace: &str) -> Result<Option<RoleAuthority>> {
        self.load_role(namespace)
    }
}

#[async_trait]
impl CredentialStore for FileRoleRegistry {
    async fn all_credentials(&self, subject: &Identity) -> Result<Vec<Credential>> {
        self.credentials_of(subject)
    }
}

#[async_trait]
impl DidResolver for FileRoleRegistry {
    async fn read(&self, identity: &Identity) -> Result<DidDocument> {
        self.load_document(identity)
    }
}

#[async_trait]
impl StatusListChecker for FileRoleRegistry {
    async fn verify(&self, entry: &StatusListEntry) -> Result<EntryStatus> {
        let list = self.load_status_list(&entry.status_list_credential)?;
        entry_status(&list, entry)
    }

    async fn fetch(&self, status_list_uri: &str) -> Result<StatusListCredential> {
        self.load_status_list(status_list_uri)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Namespaces and identity addresses become file names, so only a
/// conservative character set is accepted.
fn is_safe_stem(stem: &str) -> bool {
    !stem.is_empty()
        && !stem.starts_with('.')
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

fn file_stem(namespace: &str) -> Result<&str> {
    if is_safe_stem(namespace) {
        Ok(namespace)
    } else {
        Err(AuthorityError::Storage(format!(
            "namespace {namespace:?} cannot be stored"
        )))
    }
}

fn address_stem(identity: &Identity) -> Result<String> {
    let address = identity.address();
    if is_safe_stem(&address) {
        Ok(address)
    } else {
        Err(AuthorityError::Storage(format!(
            "identity {identity} cannot be stored"
        )))
    }
}

fn write_versioned<T: Serialize>(path: &Path, body: T) -> Result<()> {
    let json = serde_json::to_string_pretty(&Versioned {
        version: REGISTRY_FILE_VERSION,
        body,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Write to a sibling temp file, then rename into place.
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_versioned<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)?;
    let file: Versioned<T> = serde_json::from_slice(&bytes).map_err(|e| {
        AuthorityError::InvalidFileFormat(format!("failed to parse {}: {e}", path.display()))
    })?;
    if file.version != REGISTRY_FILE_VERSION {
        return Err(AuthorityError::InvalidFileFormat(format!(
            "unsupported registry file version {} in {}",
            file.version,
            path.display()
        )));
    }
    Ok(file.body)
}

/// `.json` files directly inside `dir`, sorted by name.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
