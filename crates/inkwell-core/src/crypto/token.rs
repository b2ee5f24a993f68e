//! Ciphertext token layout.
//!
//! A token is the unit stored in a text column. Its bytes are
//!
//! ```text
//! version(1) | kdf-id(1) | kdf-params | salt(16) | nonce(12) | ciphertext | tag(16)
//! ```
//!
//! encoded as unpadded URL-safe base64. PBKDF2 params are one big-endian
//! `u32` (iterations); Argon2id params are three (memory KiB, iterations,
//! parallelism). Everything before the salt is the header, which the cipher
//! authenticates as associated data.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::kdf::{KdfAlgorithm, KdfParams, Salt, SALT_LENGTH};
use crate::error::{InkwellError, Result};

/// Current token format version.
pub const TOKEN_VERSION: u8 = 1;

/// AES-GCM nonce length (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length (128 bits).
pub const TAG_LENGTH: usize = 16;

/// Smallest framed token: version, kdf id and one param, then salt, nonce
/// and an empty message's tag.
pub const MIN_TOKEN_LENGTH: usize = 2 + 4 + SALT_LENGTH + NONCE_LENGTH + TAG_LENGTH;

/// A parsed ciphertext token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken {
    pub params: KdfParams,
    pub salt: Salt,
    pub nonce: [u8; NONCE_LENGTH],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

impl CipherToken {
    /// Header bytes, used as associated data.
    pub fn header(&self) -> Vec<u8> {
        encode_header(&self.params)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let mut out =
            Vec::with_capacity(header.len() + SALT_LENGTH + NONCE_LENGTH + self.ciphertext.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse raw token bytes.
    ///
    /// Input too short to hold the smallest header, salt, nonce and tag is
    /// malformed. A framed token whose header does not describe a supported
    /// version, algorithm and cost range fails as `Authentication`, the same
    /// as any other altered byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_TOKEN_LENGTH {
            return Err(malformed("truncated"));
        }
        Self::parse(bytes).ok_or_else(|| {
            tracing::debug!(len = bytes.len(), "rejected token header");
            InkwellError::Authentication
        })
    }

    fn parse(bytes: &[u8]) -> Option<Self> {
        let mut reader = Reader::new(bytes);

        if reader.u8()? != TOKEN_VERSION {
            return None;
        }

        let params = match KdfAlgorithm::from_id(reader.u8()?).ok()? {
            KdfAlgorithm::Pbkdf2Sha256 => KdfParams::Pbkdf2Sha256 {
                iterations: reader.u32()?,
            },
            KdfAlgorithm::Argon2id => KdfParams::Argon2id {
                memory_kib: reader.u32()?,
                iterations: reader.u32()?,
                parallelism: reader.u32()?,
            },
        };
        params.validate().ok()?;

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(reader.take(SALT_LENGTH)?);
        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(reader.take(NONCE_LENGTH)?);

        let ciphertext = reader.rest();
        if ciphertext.len() < TAG_LENGTH {
            return None;
        }

        Some(Self {
            params,
            salt,
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Text-safe form for storage.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    pub fn decode(text: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(text)
            .map_err(|e| malformed(format!("invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

pub(crate) fn encode_header(params: &KdfParams) -> Vec<u8> {
    let mut header = vec![TOKEN_VERSION, params.algorithm().id()];
    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            header.extend_from_slice(&iterations.to_be_bytes());
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            header.extend_from_slice(&memory_kib.to_be_bytes());
            header.extend_from_slice(&iterations.to_be_bytes());
            header.extend_from_slice(&parallelism.to_be_bytes());
        }
    }
    header
}

fn malformed(detail: impl Into<String>) -> InkwellError {
    InkwellError::Validation(format!("Malformed ciphertext token: {}", detail.into()))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    fn u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn u32(&mut self) -> Option<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Some(u32::from_be_bytes(buf))
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(params: KdfParams) -> CipherToken {
        CipherToken {
            params,
            salt: [7u8; SALT_LENGTH],
            nonce: [9u8; NONCE_LENGTH],
            ciphertext: vec![0xAB; TAG_LENGTH + 5],
        }
    }

    #[test]
    fn test_pbkdf2_header_layout() {
        let token = sample(KdfParams::pbkdf2(100_000));
        assert_eq!(token.header(), vec![1, 1, 0x00, 0x01, 0x86, 0xA0]);
    }

    #[test]
    fn test_argon2_header_layout() {
        let token = sample(KdfParams::Argon2id {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 1,
        });
        assert_eq!(
            token.header(),
            vec![1, 2, 0, 1, 0, 0, 0, 0, 0, 3, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_encoding_is_text_safe() {
        let token = sample(KdfParams::argon2id());
        let text = token.encode();
        assert!(text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(CipherToken::decode(&text).unwrap(), token);
    }

    #[test]
    fn test_unknown_version_fails_authentication() {
        let mut bytes = sample(KdfParams::default()).to_bytes();
        bytes[0] = 2;
        assert!(matches!(
            CipherToken::from_bytes(&bytes),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_unknown_algorithm_fails_authentication() {
        let mut bytes = sample(KdfParams::default()).to_bytes();
        bytes[1] = 0x7F;
        assert!(matches!(
            CipherToken::from_bytes(&bytes),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_out_of_range_params_fail_authentication() {
        let mut bytes = sample(KdfParams::default()).to_bytes();
        // Push iterations to ~4 billion
        bytes[2] = 0xFF;
        assert!(matches!(
            CipherToken::from_bytes(&bytes),
            Err(InkwellError::Authentication)
        ));

        let mut bytes = sample(KdfParams::argon2id()).to_bytes();
        bytes[13] = 0;
        assert!(matches!(
            CipherToken::from_bytes(&bytes),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_every_header_bit_flip_fails_authentication() {
        let bytes = sample(KdfParams::argon2id()).to_bytes();
        let header_len = encode_header(&KdfParams::argon2id()).len();
        for index in 0..header_len {
            for bit in 0..8 {
                let mut tampered = bytes.clone();
                tampered[index] ^= 1 << bit;
                let result = CipherToken::from_bytes(&tampered);
                assert!(
                    matches!(result, Ok(_) | Err(InkwellError::Authentication)),
                    "byte {} bit {} gave {:?}",
                    index,
                    bit,
                    result
                );
            }
        }
    }

    #[test]
    fn test_short_input_is_malformed() {
        let bytes = sample(KdfParams::default()).to_bytes();
        for len in 0..MIN_TOKEN_LENGTH {
            assert!(
                matches!(
                    CipherToken::from_bytes(&bytes[..len]),
                    Err(InkwellError::Validation(_))
                ),
                "length {} should be rejected",
                len
            );
        }
    }

    #[test]
    fn test_framed_token_missing_tag_fails_authentication() {
        let mut token = sample(KdfParams::argon2id());
        token.ciphertext.truncate(TAG_LENGTH - 1);
        let bytes = token.to_bytes();
        assert!(bytes.len() >= MIN_TOKEN_LENGTH);
        assert!(matches!(
            CipherToken::from_bytes(&bytes),
            Err(InkwellError::Authentication)
        ));
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        let text = sample(KdfParams::default()).encode();
        assert!(CipherToken::decode(&text).is_ok());
        for altered in [format!(" {}", text), format!("{}\n", text), format!("{} ", text)] {
            assert!(matches!(
                CipherToken::decode(&altered),
                Err(InkwellError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = CipherToken::decode("not base64!!").unwrap_err();
        assert!(err.to_string().contains("invalid base64"));
        assert!(CipherToken::decode("").is_err());
    }
}
