//! Name hashing.
//!
//! Animations and nodes are looked up by name often enough that comparing
//! strings first would be wasteful. Names are hashed once with xxh3 and the
//! 64-bit digest is compared before falling back to the string itself.

use xxhash_rust::xxh3::xxh3_64;

/// Hashed identifier of a name.
pub type NameId = u64;

/// Hashes a name into its [`NameId`].
#[inline]
#[must_use]
pub fn hash_name(name: &str) -> NameId {
    xxh3_64(name.as_bytes())
}
