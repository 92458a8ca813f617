//! Multipart boundary generation.

use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed prefix of the hashed seed.
const SEED_PREFIX: &str = "bounds";

/// Literal prepended to the primary boundary for the alternative part.
pub const ALTERNATIVE_PREFIX: &str = "sub_";

/// Per-process sequence mixed into the seed so that messages created
/// within the same millisecond still get distinct boundaries.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A multipart boundary token.
///
/// The token is the hex-encoded SHA-256 digest of a timestamp seed, so it
/// is 64 lowercase hex characters and never needs quoting or escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Generates a fresh boundary from the current time.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let boundary = Self::from_seed(&format!("{SEED_PREFIX} {millis} {seq}"));
        tracing::trace!(boundary = %boundary, "generated boundary");
        boundary
    }

    /// Derives a boundary by hashing an arbitrary seed.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Returns the boundary token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the boundary for the nested multipart/alternative part.
    #[must_use]
    pub fn alternative(&self) -> String {
        format!("{ALTERNATIVE_PREFIX}{}", self.0)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
