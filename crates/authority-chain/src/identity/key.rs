//! Issuer key material.
//!
//! An `IssuerKey` is an Ed25519 key pair that can sign role credentials and
//! status lists. Its address is derived from the public key, so the key
//! alone determines the DID it signs for.

use ed25519_dalek::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::crypto::keys::Ed25519KeyPair;

use super::did::{DidDocument, Identity, ServiceEndpoint, VerificationMethod};

/// Network segment used when none is given.
pub const DEFAULT_NETWORK: &str = "volta";

/// Verification method type published for issuer keys.
pub const VERIFICATION_METHOD_TYPE: &str = "Ed25519VerificationKey2018";

/// The key pair behind an issuing or revoking identity.
pub struct IssuerKey {
    key_pair: Ed25519KeyPair,
    network: String,
}

impl IssuerKey {
    /// Create a key with a fresh random key pair.
    pub fn generate(network: Option<&str>) -> Self {
        Self {
            key_pair: Ed25519KeyPair::generate(),
            network: network.unwrap_or(DEFAULT_NETWORK).to_string(),
        }
    }

    /// Reconstruct a key from its 32-byte seed.
    pub fn from_seed(seed: &[u8; 32], network: Option<&str>) -> Self {
        Self {
            key_pair: Ed25519KeyPair::from_signing_key_bytes(seed),
            network: network.unwrap_or(DEFAULT_NETWORK).to_string(),
        }
    }

    /// `0x` + hex of the first 20 bytes of SHA-256(public key).
    pub fn address(&self) -> String {
        let hash = Sha256::digest(self.key_pair.verifying_key_bytes());
        format!("0x{}", hex::encode(&hash[..20]))
    }

    /// Chain-qualified DID for this key.
    pub fn did(&self) -> Identity {
        Identity::new(format!("did:ethr:{}:{}", self.network, self.address()))
    }

    /// Id of the verification method this key signs as.
    pub fn verification_method_id(&self) -> String {
        format!("{}#controller", self.did())
    }

    pub fn signing_key(&self) -> &SigningKey {
        self.key_pair.signing_key()
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.key_pair.verifying_key()
    }

    /// Return the public key as base64.
    pub fn public_key_base64(&self) -> String {
        base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            self.key_pair.verifying_key_bytes(),
        )
    }

    /// The DID document publishing this key.
    pub fn to_document(&self) -> DidDocument {
        let did = self.did();
        DidDocument {
            verification_method: vec![VerificationMethod {
                id: self.verification_method_id(),
                method_type: VERIFICATION_METHOD_TYPE.to_string(),
                controller: did.clone(),
                public_key_base64: self.public_key_base64(),
            }],
            service: Vec::new(),
            id: did,
        }
    }

    /// The DID document with credential service endpoints attached.
    pub fn to_document_with_services(&self, service: Vec<ServiceEndpoint>) -> DidDocument {
        DidDocument {
            service,
            ..self.to_document()
        }
    }
}
