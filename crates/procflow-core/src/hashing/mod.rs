//! Hashing canónico de definiciones.

pub mod digest;
pub mod hash;

pub use digest::{compute_digest, ContentDigest, DigestVisitor};
pub use hash::{hash_bytes, hash_str};
