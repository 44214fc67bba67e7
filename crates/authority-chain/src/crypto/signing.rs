//! Ed25519 signing and verification.
//!
//! VC proofs carry signatures in standard base64; compact claim tokens use
//! base64url without padding (JWS).

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::error::{AuthorityError, Result};

/// Sign a message with an Ed25519 signing key.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> Signature {
    signing_key.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &Signature) -> Result<()> {
    verifying_key
        .verify(message, signature)
        .map_err(|_| AuthorityError::SignatureInvalid)
}

/// Sign a message and return the signature as a base64-encoded string.
pub fn sign_to_base64(signing_key: &SigningKey, message: &[u8]) -> String {
    STANDARD.encode(sign(signing_key, message).to_bytes())
}

/// Sign a message and return the signature as unpadded base64url.
pub fn sign_to_base64url(signing_key: &SigningKey, message: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(sign(signing_key, message).to_bytes())
}

/// Verify a base64-encoded signature.
pub fn verify_from_base64(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature_b64: &str,
) -> Result<()> {
    let sig_bytes = STANDARD
        .decode(signature_b64)
        .map_err(|e| AuthorityError::InvalidKey(format!("invalid base64 signature: {e}")))?;
    verify_raw(verifying_key, message, sig_bytes)
}

/// Verify an unpadded base64url signature (JWS signature segment).
pub fn verify_from_base64url(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature_b64url: &str,
) -> Result<()> {
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64url)
        .map_err(|e| AuthorityError::InvalidKey(format!("invalid base64url signature: {e}")))?;
    verify_raw(verifying_key, message, sig_bytes)
}

fn verify_raw(verifying_key: &VerifyingKey, message: &[u8], sig_bytes: Vec<u8>) -> Result<()> {
    let sig_array: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| AuthorityError::InvalidKey("signature must be 64 bytes".into()))?;
    verify(verifying_key, message, &Signature::from_bytes(&sig_array))
}
