//! Password-derived authenticated encryption.
//!
//! Text is sealed with AES-256-GCM under a key derived from the passphrase
//! and a random per-entry salt. The token header (format version and KDF
//! parameters) is authenticated as associated data, so a token whose
//! parameters were altered fails the same way a wrong passphrase does.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use super::kdf::{derive_key, generate_salt, DerivedKey, KdfParams, Salt};
use super::passphrase::validate_passphrase;
use super::token::{encode_header, CipherToken, NONCE_LENGTH};
use crate::error::{InkwellError, Result};

/// Both encrypted fields of one entry, sealed under a shared salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEntry {
    pub title: String,
    pub content: String,
}

/// Stateless encryption codec configured with the KDF parameters used for
/// new tokens. Decryption always follows the parameters recorded in the token.
#[derive(Debug, Clone)]
pub struct Codec {
    params: KdfParams,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            params: KdfParams::default(),
        }
    }
}

impl Codec {
    /// Create a codec, rejecting parameters outside the accepted cost range.
    pub fn new(params: KdfParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` into a text-safe token with a fresh salt and nonce.
    ///
    /// # Examples
    ///
    /// ```
    /// use inkwell_core::crypto::{Codec, KdfParams};
    ///
    /// let codec = Codec::new(KdfParams::pbkdf2(10_000)).unwrap();
    /// let token = codec.encrypt("Today was hard.", "correct-horse").unwrap();
    /// assert_eq!(codec.decrypt(&token, "correct-horse").unwrap(), "Today was hard.");
    /// assert!(codec.decrypt(&token, "wrong-pass").unwrap_err().is_authentication());
    /// ```
    pub fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String> {
        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, &self.params)?;
        Ok(seal(&key, &self.params, salt, plaintext.as_bytes())?.encode())
    }

    /// Encrypt an entry's title and content with a single key derivation.
    ///
    /// Both tokens carry the same salt and distinct nonces.
    pub fn seal_entry(&self, title: &str, content: &str, passphrase: &str) -> Result<SealedEntry> {
        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, &self.params)?;
        Ok(SealedEntry {
            title: seal(&key, &self.params, salt, title.as_bytes())?.encode(),
            content: seal(&key, &self.params, salt, content.as_bytes())?.encode(),
        })
    }

    /// Decrypt a token produced by [`Codec::encrypt`] or [`Codec::seal_entry`].
    ///
    /// # Errors
    ///
    /// - `InkwellError::Validation` for an empty passphrase, or input that is
    ///   not base64 or too short to be a token
    /// - `InkwellError::Authentication` for a wrong passphrase or any altered
    ///   byte, header included
    pub fn decrypt(&self, token: &str, passphrase: &str) -> Result<String> {
        validate_passphrase(passphrase)?;
        let token = CipherToken::decode(token)?;
        let key = derive_key(passphrase, &token.salt, &token.params)?;
        open(&key, &token)
    }

    /// Decrypt a token, reusing keys already derived by `cache`.
    pub fn decrypt_cached(&self, token: &str, cache: &mut KeyCache<'_>) -> Result<String> {
        let token = CipherToken::decode(token)?;
        let key = cache.key_for(token.salt, &token.params)?;
        open(key, &token)
    }
}

/// Derived keys for one passphrase, memoized by (salt, KDF parameters).
///
/// Meant to live for a single batch operation such as a listing.
pub struct KeyCache<'p> {
    passphrase: &'p str,
    keys: HashMap<(Salt, KdfParams), DerivedKey>,
    derivations: usize,
}

impl<'p> KeyCache<'p> {
    pub fn new(passphrase: &'p str) -> Result<Self> {
        validate_passphrase(passphrase)?;
        Ok(Self {
            passphrase,
            keys: HashMap::new(),
            derivations: 0,
        })
    }

    /// Return the key for `salt` and `params`, deriving it on first use.
    pub fn key_for(&mut self, salt: Salt, params: &KdfParams) -> Result<&DerivedKey> {
        match self.keys.entry((salt, *params)) {
            MapEntry::Occupied(entry) => Ok(entry.into_mut()),
            MapEntry::Vacant(entry) => {
                let key = derive_key(self.passphrase, &salt, params)?;
                self.derivations += 1;
                Ok(entry.insert(key))
            }
        }
    }

    /// Number of key derivations performed so far.
    pub fn derivations(&self) -> usize {
        self.derivations
    }
}

impl std::fmt::Debug for KeyCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("passphrase", &"[REDACTED]")
            .field("keys", &self.keys.len())
            .field("derivations", &self.derivations)
            .finish()
    }
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| InkwellError::Crypto(format!("Invalid key length: {}", e)))
}

fn seal(key: &DerivedKey, params: &KdfParams, salt: Salt, plaintext: &[u8]) -> Result<CipherToken> {
    let cipher = cipher_for(key)?;

    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let header = encode_header(params);
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| InkwellError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(CipherToken {
        params: *params,
        salt,
        nonce,
        ciphertext,
    })
}

fn open(key: &DerivedKey, token: &CipherToken) -> Result<String> {
    let cipher = cipher_for(key)?;
    let header = token.header();
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&token.nonce),
            Payload {
                msg: &token.ciphertext,
                aad: &header,
            },
        )
        .map_err(|_| InkwellError::Authentication)?;

    String::from_utf8(plaintext)
        .map_err(|_| InkwellError::Validation("Decrypted text is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use super::*;
    use crate::crypto::kdf::{ARGON2_MIN_MEMORY_KIB, PBKDF2_MIN_ITERATIONS, SALT_LENGTH};
    use crate::crypto::token::TAG_LENGTH;

    fn codec() -> Codec {
        Codec::new(KdfParams::pbkdf2(PBKDF2_MIN_ITERATIONS)).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let codec = codec();
        let token = codec.encrypt("Today was hard.", "correct-horse").unwrap();
        assert_eq!(codec.decrypt(&token, "correct-horse").unwrap(), "Today was hard.");
    }

    #[test]
    fn test_round_trip_edge_plaintexts() {
        let codec = codec();
        for plaintext in ["", " ", "multi\nline\nbody", "naïve café ☕ 日記", "$:|"] {
            let token = codec.encrypt(plaintext, "correct-horse").unwrap();
            assert_eq!(codec.decrypt(&token, "correct-horse").unwrap(), plaintext);
        }
    }

    #[test]
    fn test_argon2_round_trip() {
        let codec = Codec::new(KdfParams::Argon2id {
            memory_kib: ARGON2_MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let token = codec.encrypt("argon entry", "correct-horse").unwrap();
        assert_eq!(codec.decrypt(&token, "correct-horse").unwrap(), "argon entry");
        assert!(matches!(
            codec.decrypt(&token, "wrong-pass"),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_decrypt_follows_token_params() {
        let token = codec().encrypt("old entry", "correct-horse").unwrap();
        let newer = Codec::new(KdfParams::pbkdf2(PBKDF2_MIN_ITERATIONS * 2)).unwrap();
        assert_eq!(newer.decrypt(&token, "correct-horse").unwrap(), "old entry");
    }

    #[test]
    fn test_wrong_passphrase_is_authentication_error() {
        let codec = codec();
        let token = codec.encrypt("Today was hard.", "correct-horse").unwrap();
        let result = codec.decrypt(&token, "wrong-pass");
        assert!(matches!(result, Err(InkwellError::Authentication)));
    }

    #[test]
    fn test_any_flipped_byte_is_authentication_error() {
        let codec = codec();
        let token = codec.encrypt("secret", "correct-horse").unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();

        for index in 0..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[index] ^= 0x01;
            let result = codec.decrypt(&URL_SAFE_NO_PAD.encode(&tampered), "correct-horse");
            assert!(
                matches!(result, Err(InkwellError::Authentication)),
                "byte {} gave {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn test_truncated_tag_is_rejected() {
        let codec = codec();
        let token = codec.encrypt("secret", "correct-horse").unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();
        bytes.truncate(bytes.len() - 1);
        let result = codec.decrypt(&URL_SAFE_NO_PAD.encode(&bytes), "correct-horse");
        assert!(matches!(result, Err(InkwellError::Authentication)));
    }

    #[test]
    fn test_same_plaintext_encrypts_differently() {
        let codec = codec();
        let first = codec.encrypt("same words", "correct-horse").unwrap();
        let second = codec.encrypt("same words", "correct-horse").unwrap();
        assert_ne!(first, second);

        let salt_a = CipherToken::decode(&first).unwrap().salt;
        let salt_b = CipherToken::decode(&second).unwrap().salt;
        assert_ne!(salt_a, salt_b);

        assert_eq!(codec.decrypt(&first, "correct-horse").unwrap(), "same words");
        assert_eq!(codec.decrypt(&second, "correct-horse").unwrap(), "same words");
    }

    #[test]
    fn test_seal_entry_shares_salt_not_nonce() {
        let codec = codec();
        let sealed = codec.seal_entry("Title", "Body", "correct-horse").unwrap();
        let title = CipherToken::decode(&sealed.title).unwrap();
        let content = CipherToken::decode(&sealed.content).unwrap();

        assert_eq!(title.salt, content.salt);
        assert_ne!(title.nonce, content.nonce);
        assert_eq!(codec.decrypt(&sealed.title, "correct-horse").unwrap(), "Title");
        assert_eq!(codec.decrypt(&sealed.content, "correct-horse").unwrap(), "Body");
    }

    #[test]
    fn test_key_cache_derives_once_per_salt() {
        let codec = codec();
        let first = codec.seal_entry("a", "b", "correct-horse").unwrap();
        let second = codec.seal_entry("c", "d", "correct-horse").unwrap();

        let mut cache = KeyCache::new("correct-horse").unwrap();
        for token in [&first.title, &first.content, &second.title, &second.content] {
            codec.decrypt_cached(token, &mut cache).unwrap();
        }
        assert_eq!(cache.derivations(), 2);
    }

    #[test]
    fn test_key_cache_wrong_passphrase() {
        let codec = codec();
        let token = codec.encrypt("secret", "correct-horse").unwrap();
        let mut cache = KeyCache::new("wrong-pass").unwrap();
        assert!(matches!(
            codec.decrypt_cached(&token, &mut cache),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_key_cache_debug_redacts_passphrase() {
        let cache = KeyCache::new("correct-horse").unwrap();
        let debug_output = format!("{:?}", cache);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("correct-horse"));
    }

    #[test]
    fn test_empty_passphrase_is_validation_error() {
        let codec = codec();
        assert!(matches!(
            codec.encrypt("text", ""),
            Err(InkwellError::Validation(_))
        ));
        let token = codec.encrypt("text", "correct-horse").unwrap();
        assert!(matches!(
            codec.decrypt(&token, "  "),
            Err(InkwellError::Validation(_))
        ));
        assert!(KeyCache::new("").is_err());
    }

    #[test]
    fn test_malformed_token_is_validation_error() {
        let codec = codec();
        for token in ["", "plain text title", "AAAA", "gAAAAABk-fernet-looking"] {
            assert!(
                matches!(
                    codec.decrypt(token, "correct-horse"),
                    Err(InkwellError::Validation(_))
                ),
                "token {:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_non_utf8_plaintext_is_validation_error() {
        let params = KdfParams::pbkdf2(PBKDF2_MIN_ITERATIONS);
        let salt = [3u8; SALT_LENGTH];
        let key = derive_key("correct-horse", &salt, &params).unwrap();
        let token = seal(&key, &params, salt, &[0xFF, 0xFE, 0xFD]).unwrap();

        let result = codec().decrypt(&token.encode(), "correct-horse");
        assert!(matches!(result, Err(InkwellError::Validation(_))));
    }

    #[test]
    fn test_ciphertext_length_overhead() {
        let codec = codec();
        let token = codec.encrypt("12345", "correct-horse").unwrap();
        let parsed = CipherToken::decode(&token).unwrap();
        assert_eq!(parsed.ciphertext.len(), 5 + TAG_LENGTH);
    }

    #[test]
    fn test_codec_rejects_weak_params() {
        assert!(Codec::new(KdfParams::pbkdf2(1)).is_err());
    }
}
