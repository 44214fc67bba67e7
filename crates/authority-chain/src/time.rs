//! Time utilities for authority-chain.
//!
//! Credentials carry two expiry encodings: RFC 3339 strings on VCs
//! (`expirationDate`) and Unix seconds on signed claims (`exp`).

use chrono::{DateTime, Utc};

use crate::error::{AuthorityError, Result};

/// Return the current instant.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an RFC 3339 timestamp as found in VC `issuanceDate` / `expirationDate`.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AuthorityError::MalformedCredential(format!("invalid timestamp {value:?}: {e}")))
}

/// Convert a JWT `exp` / `iat` claim (seconds since Unix epoch).
pub fn from_unix_seconds(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        AuthorityError::MalformedCredential(format!("timestamp out of range: {secs}"))
    })
}

/// Format an instant the way VCs serialize it (second precision, `Z` suffix).
pub fn to_rfc3339(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
