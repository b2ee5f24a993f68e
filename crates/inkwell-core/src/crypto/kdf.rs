//! Passphrase key derivation.
//!
//! Two algorithms are supported: PBKDF2-HMAC-SHA256 (the default, iteration
//! hardened) and Argon2id (memory-hard, resistant to GPU-based attacks).
//! Parameters travel inside every ciphertext token, so changing the
//! configured defaults never strands existing entries.

use std::fmt;

use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::passphrase::validate_passphrase;
use crate::error::{InkwellError, Result};

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Length of the random salt generated per sealed entry.
pub const SALT_LENGTH: usize = 16;

/// PBKDF2 iteration bounds.
///
/// The upper bound keeps a tampered token from pinning the CPU.
pub const PBKDF2_DEFAULT_ITERATIONS: u32 = 100_000;
pub const PBKDF2_MIN_ITERATIONS: u32 = 10_000;
pub const PBKDF2_MAX_ITERATIONS: u32 = 10_000_000;

/// Argon2id parameter bounds (memory in KiB).
pub const ARGON2_DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
pub const ARGON2_DEFAULT_ITERATIONS: u32 = 3;
pub const ARGON2_DEFAULT_PARALLELISM: u32 = 1;
pub const ARGON2_MIN_MEMORY_KIB: u32 = 8 * 1024;
pub const ARGON2_MAX_MEMORY_KIB: u32 = 1024 * 1024;
pub const ARGON2_MAX_ITERATIONS: u32 = 100;
pub const ARGON2_MAX_PARALLELISM: u32 = 16;

/// A random KDF salt. Not secret; stored alongside the ciphertext.
pub type Salt = [u8; SALT_LENGTH];

/// Identifier of a key derivation algorithm, as written into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdfAlgorithm {
    Pbkdf2Sha256,
    Argon2id,
}

impl KdfAlgorithm {
    /// Wire identifier.
    pub fn id(self) -> u8 {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => 1,
            KdfAlgorithm::Argon2id => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(KdfAlgorithm::Pbkdf2Sha256),
            2 => Ok(KdfAlgorithm::Argon2id),
            other => Err(InkwellError::Validation(format!(
                "Unknown key derivation algorithm id {}",
                other
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => "pbkdf2_sha256",
            KdfAlgorithm::Argon2id => "argon2id",
        }
    }
}

impl fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Algorithm plus cost parameters.
///
/// Serialized with an `algorithm` tag so it can sit directly in a config
/// section:
///
/// ```toml
/// algorithm = "pbkdf2_sha256"
/// iterations = 100000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfParams {
    Pbkdf2Sha256 {
        #[serde(default = "default_pbkdf2_iterations")]
        iterations: u32,
    },
    Argon2id {
        #[serde(default = "default_argon2_memory")]
        memory_kib: u32,
        #[serde(default = "default_argon2_iterations")]
        iterations: u32,
        #[serde(default = "default_argon2_parallelism")]
        parallelism: u32,
    },
}

fn default_pbkdf2_iterations() -> u32 {
    PBKDF2_DEFAULT_ITERATIONS
}

fn default_argon2_memory() -> u32 {
    ARGON2_DEFAULT_MEMORY_KIB
}

fn default_argon2_iterations() -> u32 {
    ARGON2_DEFAULT_ITERATIONS
}

fn default_argon2_parallelism() -> u32 {
    ARGON2_DEFAULT_PARALLELISM
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams::Pbkdf2Sha256 {
            iterations: PBKDF2_DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// PBKDF2-HMAC-SHA256 with the given iteration count.
    pub fn pbkdf2(iterations: u32) -> Self {
        KdfParams::Pbkdf2Sha256 { iterations }
    }

    /// Argon2id with the default cost parameters.
    pub fn argon2id() -> Self {
        KdfParams::Argon2id {
            memory_kib: ARGON2_DEFAULT_MEMORY_KIB,
            iterations: ARGON2_DEFAULT_ITERATIONS,
            parallelism: ARGON2_DEFAULT_PARALLELISM,
        }
    }

    pub fn algorithm(&self) -> KdfAlgorithm {
        match self {
            KdfParams::Pbkdf2Sha256 { .. } => KdfAlgorithm::Pbkdf2Sha256,
            KdfParams::Argon2id { .. } => KdfAlgorithm::Argon2id,
        }
    }

    /// Check the parameters against the accepted cost range.
    pub fn validate(&self) -> Result<()> {
        match *self {
            KdfParams::Pbkdf2Sha256 { iterations } => {
                if !(PBKDF2_MIN_ITERATIONS..=PBKDF2_MAX_ITERATIONS).contains(&iterations) {
                    return Err(InkwellError::Validation(format!(
                        "PBKDF2 iterations must be between {} and {} (got {})",
                        PBKDF2_MIN_ITERATIONS, PBKDF2_MAX_ITERATIONS, iterations
                    )));
                }
            }
            KdfParams::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if !(ARGON2_MIN_MEMORY_KIB..=ARGON2_MAX_MEMORY_KIB).contains(&memory_kib) {
                    return Err(InkwellError::Validation(format!(
                        "Argon2 memory must be between {} and {} KiB (got {})",
                        ARGON2_MIN_MEMORY_KIB, ARGON2_MAX_MEMORY_KIB, memory_kib
                    )));
                }
                if !(1..=ARGON2_MAX_ITERATIONS).contains(&iterations) {
                    return Err(InkwellError::Validation(format!(
                        "Argon2 iterations must be between 1 and {} (got {})",
                        ARGON2_MAX_ITERATIONS, iterations
                    )));
                }
                if !(1..=ARGON2_MAX_PARALLELISM).contains(&parallelism) {
                    return Err(InkwellError::Validation(format!(
                        "Argon2 parallelism must be between 1 and {} (got {})",
                        ARGON2_MAX_PARALLELISM, parallelism
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A cryptographic key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt from the operating system RNG.
pub fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive an encryption key from a passphrase.
///
/// # Security
///
/// - Same passphrase + salt + params always produces the same key
/// - Different salt produces a different key (salt is stored with the token)
/// - Cost parameters are range-checked before any work is done
///
/// # Examples
///
/// ```
/// use inkwell_core::crypto::{derive_key, KdfParams};
///
/// let salt = b"unique-salt-16by";
/// let key = derive_key("my-passphrase", salt, &KdfParams::pbkdf2(10_000)).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    validate_passphrase(passphrase)?;

    if salt.len() < SALT_LENGTH {
        return Err(InkwellError::Validation(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    params.validate()?;

    let mut key_bytes = [0u8; KEY_LENGTH];
    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key_bytes);
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let argon_params =
                argon2::Params::new(memory_kib, iterations, parallelism, Some(KEY_LENGTH))
                    .map_err(|e| {
                        InkwellError::Crypto(format!("Failed to create Argon2 params: {}", e))
                    })?;
            let argon2 =
                Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, argon_params);
            argon2
                .hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes)
                .map_err(|e| InkwellError::Crypto(format!("Key derivation failed: {}", e)))?;
        }
    }

    tracing::debug!(algorithm = %params.algorithm(), "derived key");

    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}
