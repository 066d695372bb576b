//! Public tracking codes.
//!
//! Codes are 8 characters from `[A-Z0-9]`. Generated codes are two
//! letters followed by six digits (`QK482913`); lookups accept any
//! 8-character alphanumeric code and normalize to upper case first.

use once_cell::sync::Lazy;
use rand::{rngs::OsRng, Rng};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::future::Future;

use crate::config::{
    TRACKING_CODE_LENGTH, TRACKING_CODE_MAX_ATTEMPTS, TRACKING_CODE_PREFIX_LETTERS,
};
use crate::errors::{AppError, AppResult};

static CODE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[A-Z0-9]{{{}}}$", TRACKING_CODE_LENGTH))
        .unwrap_or_else(|_| unreachable!("tracking code pattern is a valid regex"))
});

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Upper-case normalized tracking code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Normalize and validate a code supplied by a caller.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if CODE_FORMAT.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(AppError::validation(format!(
                "Tracking code must be {} letters or digits",
                TRACKING_CODE_LENGTH
            )))
        }
    }

    /// Draw a fresh candidate from the OS random source.
    pub fn random() -> Self {
        let mut rng = OsRng;
        let mut code = String::with_capacity(TRACKING_CODE_LENGTH);
        for _ in 0..TRACKING_CODE_PREFIX_LETTERS {
            code.push(LETTERS[rng.gen_range(0..LETTERS.len())] as char);
        }
        for _ in TRACKING_CODE_PREFIX_LETTERS..TRACKING_CODE_LENGTH {
            code.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TrackingCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Draw candidates until `exists` reports one as free.
///
/// Gives up with `TrackingCodeExhausted` after `TRACKING_CODE_MAX_ATTEMPTS`
/// collisions; a duplicate is never returned.
pub async fn generate_unique<F, Fut>(exists: F) -> AppResult<TrackingCode>
where
    F: FnMut(TrackingCode) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    generate_with(TrackingCode::random, exists).await
}

/// Same as [`generate_unique`] with an explicit candidate source.
pub async fn generate_with<G, F, Fut>(mut candidate: G, mut exists: F) -> AppResult<TrackingCode>
where
    G: FnMut() -> TrackingCode,
    F: FnMut(TrackingCode) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    for attempt in 1..=TRACKING_CODE_MAX_ATTEMPTS {
        let code = candidate();
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        tracing::debug!(attempt, "Tracking code collision, retrying");
    }

    Err(AppError::TrackingCodeExhausted)
}

/// Run `insert` until it stores a row under a fresh code.
///
/// `insert` draws its own code on every call. A `Conflict` means a
/// concurrent writer took the code between lookup and insert; it is
/// retried within the same `TRACKING_CODE_MAX_ATTEMPTS` budget.
pub async fn insert_with_fresh_code<F, Fut, T>(mut insert: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    for attempt in 1..=TRACKING_CODE_MAX_ATTEMPTS {
        match insert().await {
            Err(AppError::Conflict(_)) => {
                tracing::debug!(attempt, "Tracking code taken at insert, retrying");
            }
            outcome => return outcome,
        }
    }

    Err(AppError::TrackingCodeExhausted)
}
