//! Minisign key encodings.
//!
//! Public key blob: `"Ed" || key_id (8) || ed25519 public key (32)`.
//!
//! Secret key blob (unencrypted):
//! `"Ed" || kdf_alg (2, zero) || "B2" || kdf_salt (32) || opslimit (8) ||
//! memlimit (8) || key_id (8) || ed25519 keypair (64) || checksum (32)`,
//! where the checksum is BLAKE2b-256 over `"Ed" || key_id || keypair`.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{VerifyingKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH};

use super::keypair::{KeyId, Keypair, KEY_ID_LEN};
use crate::error::VanityError;

type Blake2b256 = Blake2b<U32>;

const SIG_ALG: [u8; 2] = *b"Ed";
const KDF_NONE: [u8; 2] = [0, 0];
const CHK_ALG: [u8; 2] = *b"B2";
const KDF_SALT_LEN: usize = 32;
const CHECKSUM_LEN: usize = 32;

/// Length of the encoded public key blob.
pub const PUBLIC_KEY_LEN: usize = SIG_ALG.len() + KEY_ID_LEN + PUBLIC_KEY_LENGTH;

/// Length of the encoded secret key blob.
pub const SECRET_KEY_LEN: usize =
    2 + 2 + 2 + KDF_SALT_LEN + 8 + 8 + KEY_ID_LEN + KEYPAIR_LENGTH + CHECKSUM_LEN;

/// The public half of a minisign key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    id: KeyId,
    key: VerifyingKey,
}

impl PublicKey {
    pub(super) fn new(id: KeyId, key: VerifyingKey) -> Self {
        Self { id, key }
    }

    /// Returns the key id.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Returns the Ed25519 verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Returns the raw public key blob.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let mut out = [0u8; PUBLIC_KEY_LEN];
        out[..2].copy_from_slice(&SIG_ALG);
        out[2..2 + KEY_ID_LEN].copy_from_slice(self.id.as_bytes());
        out[2 + KEY_ID_LEN..].copy_from_slice(self.key.as_bytes());
        out
    }

    /// Encodes the public key in the minisign `.pub` file format.
    pub fn marshal_text(&self) -> Result<String, VanityError> {
        let mut text = String::with_capacity(120);
        writeln!(text, "untrusted comment: minisign public key {}", self.id)
            .and_then(|_| writeln!(text, "{}", self))
            .map_err(|e| VanityError::EncodingFailure(e.to_string()))?;
        Ok(text)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(self.to_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

/// Parses either a bare base64 public key or the contents of a `.pub` file.
impl FromStr for PublicKey {
    type Err = VanityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("untrusted comment:"))
            .ok_or_else(|| VanityError::MalformedKey("no key data".into()))?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| VanityError::MalformedKey(e.to_string()))?;
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(VanityError::MalformedKey(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_LEN,
                bytes.len()
            )));
        }
        if bytes[..2] != SIG_ALG {
            return Err(VanityError::MalformedKey(
                "unsupported signature algorithm".into(),
            ));
        }

        let mut id = [0u8; KEY_ID_LEN];
        id.copy_from_slice(&bytes[2..2 + KEY_ID_LEN]);
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&bytes[2 + KEY_ID_LEN..]);
        let key = VerifyingKey::from_bytes(&key)
            .map_err(|e| VanityError::MalformedKey(e.to_string()))?;

        Ok(Self::new(KeyId::from_bytes(id), key))
    }
}

impl Keypair {
    /// Returns the unencrypted secret key blob.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LEN] {
        let keypair = self.signing_key().to_keypair_bytes();
        let id = self.id();

        let mut hasher = Blake2b256::new();
        hasher.update(SIG_ALG);
        hasher.update(id.as_bytes());
        hasher.update(keypair);
        let checksum = hasher.finalize();

        let mut out = [0u8; SECRET_KEY_LEN];
        let mut pos = 0;
        let mut put = |bytes: &[u8]| {
            out[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        };
        put(&SIG_ALG);
        put(&KDF_NONE);
        put(&CHK_ALG);
        put(&[0u8; KDF_SALT_LEN]);
        put(&0u64.to_le_bytes());
        put(&0u64.to_le_bytes());
        put(id.as_bytes());
        put(&keypair);
        put(&checksum);
        out
    }

    /// Encodes the secret key in the minisign `.key` file format, unencrypted.
    pub fn marshal_secret_text(&self) -> Result<String, VanityError> {
        let mut text = String::with_capacity(300);
        writeln!(
            text,
            "untrusted comment: minisign unencrypted secret key {}",
            self.id()
        )
        .and_then(|_| writeln!(text, "{}", STANDARD.encode(self.secret_key_bytes())))
        .map_err(|e| VanityError::EncodingFailure(e.to_string()))?;
        Ok(text)
    }
}
