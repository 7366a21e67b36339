//! Action log digest.
//!
//! Two simulators that start from the same battle id and feed the same
//! explicit target choices must produce the same log. Comparing full logs over
//! the wire is wasteful, so parties exchange this 32-byte digest instead.

#[cfg(feature = "serde")]
use super::Action;

/// Computes a SHA-256 digest over an action log.
///
/// Each action is bincode-encoded with its timestamp zeroed, then hashed in
/// log order. Timestamps are wall-clock and legitimately differ between
/// simulators; everything else must match exactly.
///
/// Requires the `serde` feature.
#[cfg(feature = "serde")]
pub fn compute_log_digest(actions: &[Action]) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();

    for action in actions {
        let mut canonical = action.clone();
        canonical.timestamp_ms = 0;
        // Encoding these types does not fail.
        if let Ok(bytes) = bincode::serialize(&canonical) {
            hasher.update(&bytes);
        }
    }

    hasher.finalize().into()
}
