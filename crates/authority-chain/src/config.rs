//! Verifier configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default:
//!
//! ```json
//! {
//!     "max_chain_depth": 32,
//!     "vc_proof_purpose": "assertionMethod",
//!     "check_expiration_without_status": true
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuthorityError, Result};

pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;
pub const DEFAULT_VC_PROOF_PURPOSE: &str = "assertionMethod";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum number of `ByRole` hops one walk may take.
    pub max_chain_depth: usize,
    /// `proofPurpose` VC proofs must carry.
    pub vc_proof_purpose: String,
    /// Check expiry of chain links that carry no status list entry.
    pub check_expiration_without_status: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            vc_proof_purpose: DEFAULT_VC_PROOF_PURPOSE.to_string(),
            check_expiration_without_status: true,
        }
    }
}

impl VerifierConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse or
    /// fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| AuthorityError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(AuthorityError::Config(
                "max_chain_depth must be at least 1".into(),
            ));
        }
        if self.vc_proof_purpose.trim().is_empty() {
            return Err(AuthorityError::Config(
                "vc_proof_purpose must not be empty".into(),
            ));
        }
        Ok(())
    }
}
