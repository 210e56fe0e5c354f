//! Key generation and minisign key encodings.
//!
//! This module provides:
//! - The capability traits the search engine is generic over
//! - Secure random Ed25519 keypair generation
//! - Minisign public/secret key text encodings

mod encoding;
mod keypair;

pub use encoding::{PublicKey, PUBLIC_KEY_LEN, SECRET_KEY_LEN};
pub use keypair::{KeyId, Keypair, OsKeyGenerator};

use crate::error::VanityError;

/// A generated key whose public half has a textual form to match against.
pub trait Candidate {
    /// Returns the textual form of the public key.
    fn public_text(&self) -> String;
}

/// Produces one fresh candidate per call.
///
/// Implementations must draw from a secure randomness source and must fail
/// rather than hand out a degraded key.
pub trait KeyGenerator: Send + Sync {
    type Key: Candidate + Send + 'static;

    fn generate(&self) -> Result<Self::Key, VanityError>;
}
