//! Cipher utility
//!
//! Symmetric encryption of redacted output, key generation and validation,
//! salted slow hashing for audit fingerprints, and masking of a single
//! matched value.
//!
//! Encryption uses AES-256-GCM. The envelope is JSON text carrying the
//! algorithm name, a fresh 96-bit IV (hex) and the ciphertext with its
//! authentication tag (base64):
//!
//! ```text
//! {"algorithm":"aes-256-gcm","iv":"4f1c...","ciphertext":"q8Zk..."}
//! ```

use crate::domain::{RedactorError, Result};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of a hex-encoded 256-bit key
pub const KEY_HEX_LEN: usize = 64;

/// Token used when shape preservation is off
pub const REDACTED_TOKEN: &str = "[REDACTED]";

/// Algorithm tag written into every envelope
pub const ENVELOPE_ALGORITHM: &str = "aes-256-gcm";

const KEY_LEN: usize = 32;
const IV_LEN: usize = 12;
const DIGEST_LEN: usize = 32;
const GENERATED_SALT_LEN: usize = 16;
const MIN_SALT_LEN: usize = 8;

/// Serialized IV + ciphertext bundle
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    algorithm: String,
    iv: String,
    ciphertext: String,
}

/// Generate a random 256-bit key, hex encoded
pub fn generate_key() -> String {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(&mut key[..]);
    hex::encode(&key[..])
}

/// Check that a key is exactly 64 hexadecimal characters
pub fn validate_key_strength(key: &str) -> bool {
    key.len() == KEY_HEX_LEN && key.chars().all(|c| c.is_ascii_hexdigit())
}

/// Short, non-reversible key identifier that is safe to log
pub fn key_fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{digest:x}")[..12].to_string()
}

fn decode_key(key: &str) -> Option<Zeroizing<Vec<u8>>> {
    if !validate_key_strength(key) {
        return None;
    }
    hex::decode(key).ok().map(Zeroizing::new)
}

/// Encrypt `plaintext` into a JSON envelope
pub fn encrypt(plaintext: &str, key: &str) -> Result<String> {
    let key_bytes = decode_key(key).ok_or_else(|| {
        RedactorError::Encryption(format!(
            "Key must be {KEY_HEX_LEN} hexadecimal characters"
        ))
    })?;
    let cipher = Aes256Gcm::new_from_slice(&key_bytes)
        .map_err(|e| RedactorError::Encryption(e.to_string()))?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|e| RedactorError::Encryption(e.to_string()))?;

    let envelope = Envelope {
        algorithm: ENVELOPE_ALGORITHM.to_string(),
        iv: hex::encode(iv),
        ciphertext: STANDARD.encode(ciphertext),
    };

    tracing::debug!(
        key_id = %key_fingerprint(key),
        plaintext_len = plaintext.len(),
        "Payload encrypted"
    );

    serde_json::to_string(&envelope).map_err(|e| RedactorError::Encryption(e.to_string()))
}

/// Decrypt an envelope produced by [`encrypt`]
///
/// Fails on a malformed envelope, a wrong key, or any tampering with the IV
/// or ciphertext.
pub fn decrypt(envelope: &str, key: &str) -> Result<String> {
    let key_bytes = decode_key(key).ok_or_else(|| {
        RedactorError::Decryption(format!(
            "Key must be {KEY_HEX_LEN} hexadecimal characters"
        ))
    })?;

    let envelope: Envelope = serde_json::from_str(envelope.trim())
        .map_err(|e| RedactorError::Decryption(format!("Malformed envelope: {e}")))?;

    if envelope.algorithm != ENVELOPE_ALGORITHM {
        return Err(RedactorError::Decryption(format!(
            "Unsupported algorithm: {}",
            envelope.algorithm
        )));
    }

    let iv = hex::decode(&envelope.iv)
        .map_err(|e| RedactorError::Decryption(format!("Malformed IV: {e}")))?;
    if iv.len() != IV_LEN {
        return Err(RedactorError::Decryption(format!(
            "IV must be {IV_LEN} bytes, got {}",
            iv.len()
        )));
    }

    let ciphertext = STANDARD
        .decode(&envelope.ciphertext)
        .map_err(|e| RedactorError::Decryption(format!("Malformed ciphertext: {e}")))?;

    let cipher = Aes256Gcm::new_from_slice(&key_bytes)
        .map_err(|e| RedactorError::Decryption(e.to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_ref())
        .map_err(|_| {
            RedactorError::Decryption("Authentication failed: wrong key or tampered data".to_string())
        })?;

    String::from_utf8(plaintext)
        .map_err(|_| RedactorError::Decryption("Plaintext is not valid UTF-8".to_string()))
}

/// Salted Argon2id digest, formatted as `<salt hex>$<digest hex>`
///
/// Deterministic for a given salt. Without a salt a random one is generated,
/// so the output is only reproducible through [`verify_hash`].
pub fn hash(value: &str, salt: Option<&str>) -> Result<String> {
    let salt = match salt {
        Some(salt) => salt.as_bytes().to_vec(),
        None => {
            let mut generated = vec![0u8; GENERATED_SALT_LEN];
            OsRng.fill_bytes(&mut generated);
            generated
        }
    };
    hash_with_salt_bytes(value, &salt)
}

/// Check a value against a digest produced by [`hash`]
pub fn verify_hash(value: &str, digest: &str) -> Result<bool> {
    let (salt_hex, _) = digest
        .split_once('$')
        .ok_or_else(|| RedactorError::Validation("Digest must be <salt>$<hash>".to_string()))?;
    let salt = hex::decode(salt_hex)
        .map_err(|e| RedactorError::Validation(format!("Malformed digest salt: {e}")))?;

    Ok(hash_with_salt_bytes(value, &salt)? == digest)
}

fn hash_with_salt_bytes(value: &str, salt: &[u8]) -> Result<String> {
    if salt.len() < MIN_SALT_LEN {
        return Err(RedactorError::Validation(format!(
            "Salt must be at least {MIN_SALT_LEN} bytes"
        )));
    }

    let mut digest = [0u8; DIGEST_LEN];
    Argon2::default()
        .hash_password_into(value.as_bytes(), salt, &mut digest)
        .map_err(|e| RedactorError::Validation(format!("Hashing failed: {e}")))?;

    Ok(format!("{}${}", hex::encode(salt), hex::encode(digest)))
}

/// Mask a single matched value
///
/// With `preserve_length` off the value becomes [`REDACTED_TOKEN`]. Otherwise
/// known shapes get fixed masks (`XXX-XX-XXXX`, `(XXX) XXX-XXXX`, `XXXXX`,
/// `XXXXX-XXXX`) and anything else keeps its first and last character with
/// `mask_char` in between. That fallback reveals the length and two
/// characters of the value; values of one or two characters are masked
/// entirely.
pub fn mask_data(value: &str, mask_char: char, preserve_length: bool) -> String {
    if !preserve_length {
        return REDACTED_TOKEN.to_string();
    }

    for (shape, masked) in FIXED_SHAPES {
        if has_shape(value, shape) {
            return masked.to_string();
        }
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 2 {
        return mask_char.to_string().repeat(chars.len());
    }

    let mut masked = String::with_capacity(value.len());
    masked.push(chars[0]);
    masked.extend(std::iter::repeat(mask_char).take(chars.len() - 2));
    masked.push(chars[chars.len() - 1]);
    masked
}

/// Shapes use `9` for any ASCII digit; every other byte must match literally
const FIXED_SHAPES: [(&str, &str); 4] = [
    ("999-99-9999", "XXX-XX-XXXX"),
    ("(999) 999-9999", "(XXX) XXX-XXXX"),
    ("99999-9999", "XXXXX-XXXX"),
    ("99999", "XXXXX"),
];

fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'9' => v.is_ascii_digit(),
            _ => v == s,
        })
}
