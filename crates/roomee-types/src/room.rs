//! Canonical conversation room keys.
//!
//! A room is derived, never stored: the two participant identities in sorted,
//! dash-joined form. Joining as (A, B) or (B, A) yields the same key, so
//! either participant can reconnect and land in the same room independently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier for the conversation between two users.
///
/// Identities `"1"` and `"2"` resolve to `"1-2"` regardless of argument
/// order. No identity validation happens here; absent identities are the
/// caller's error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey(String);

impl RoomKey {
    /// Compute the room key for a pair of participant identities.
    ///
    /// Deterministic and commutative: `for_pair(a, b) == for_pair(b, a)`.
    pub fn for_pair(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{lo}-{hi}"))
    }

    /// The key in its canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
