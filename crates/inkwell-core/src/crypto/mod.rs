//! Cryptographic operations for Inkwell.
//!
//! Entry text is protected with a password-derived encryption codec:
//! - **PBKDF2-HMAC-SHA256** (default) or **Argon2id** for key derivation
//! - **AES-256-GCM** for authenticated encryption
//! - A random 16-byte salt per sealed entry, stored in the token
//!
//! ## Security Model
//!
//! - No plaintext passphrases or keys are stored
//! - Derived keys are zeroized from memory on drop
//! - A wrong passphrase or a modified token is reported as
//!   `InkwellError::Authentication`, never as garbled plaintext
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft or inspection of the entry store
//! - Offline brute-force and precomputation attacks on the passphrase
//! - Tampering with stored tokens
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory
//! - Metadata leakage (entry count, timestamps, ciphertext lengths)

pub mod codec;
pub mod kdf;
pub mod passphrase;
pub mod token;

pub use codec::{Codec, KeyCache, SealedEntry};
pub use kdf::{derive_key, generate_salt, DerivedKey, KdfAlgorithm, KdfParams, Salt};
pub use passphrase::{is_weak_passphrase, validate_passphrase};
pub use token::CipherToken;
