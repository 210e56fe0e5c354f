//! Minisign keypair generation.

use std::fmt;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;

use super::{Candidate, KeyGenerator, PublicKey};
use crate::error::VanityError;

/// Length of a minisign key id in bytes.
pub const KEY_ID_LEN: usize = 8;

/// Random identifier shared by the public and secret halves of a key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId([u8; KEY_ID_LEN]);

impl KeyId {
    /// Creates a key id from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; KEY_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the key id bytes in storage order.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; KEY_ID_LEN] {
        &self.0
    }
}

// Minisign shows the id as a little-endian integer in upper-case hex.
impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.0;
        be.reverse();
        f.write_str(&hex::encode_upper(be))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self)
    }
}

/// A minisign Ed25519 keypair.
#[derive(Clone)]
pub struct Keypair {
    id: KeyId,
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a new random keypair from the operating system's CSPRNG.
    ///
    /// Returns `GenerationFailure` if the OS cannot supply randomness.
    pub fn generate() -> Result<Self, VanityError> {
        let mut seed = [0u8; 32];
        let mut id = [0u8; KEY_ID_LEN];

        OsRng
            .try_fill_bytes(&mut seed)
            .and_then(|_| OsRng.try_fill_bytes(&mut id))
            .map_err(|e| VanityError::GenerationFailure(e.to_string()))?;

        Ok(Self::from_seed(KeyId::from_bytes(id), &seed))
    }

    /// Builds a keypair from a known key id and Ed25519 seed.
    pub fn from_seed(id: KeyId, seed: &[u8; 32]) -> Self {
        Self {
            id,
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Returns the key id.
    #[inline]
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Returns the public half.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.id, self.signing_key.verifying_key())
    }

    /// Returns the Ed25519 signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("id", &self.id)
            .field("public_key", &self.public_key().to_string())
            .finish_non_exhaustive()
    }
}

impl Candidate for Keypair {
    #[inline]
    fn public_text(&self) -> String {
        self.public_key().to_string()
    }
}

/// Generator backed by [`Keypair::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsKeyGenerator;

impl KeyGenerator for OsKeyGenerator {
    type Key = Keypair;

    #[inline]
    fn generate(&self) -> Result<Keypair, VanityError> {
        Keypair::generate()
    }
}
