//! Cryptographic primitives for authority-chain.
//!
//! This module provides:
//! - Ed25519 key generation and key decoding
//! - Ed25519 signing and verification over base64 / base64url encodings

pub mod keys;
pub mod signing;
