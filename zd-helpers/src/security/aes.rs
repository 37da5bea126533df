use ::aes::Aes256;
use ::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{Cipher, decode_base64, md5_hex};
use crate::error::{Error, Result};

pub(super) const BLOCK_SIZE: usize = 16;

/// AES-256 in ECB mode with PKCS#7 padding, base64 output.
///
/// The key is the 32-character md5 hex digest of the passphrase, so any
/// passphrase length works and the same passphrase always yields the same
/// key.
///
/// ```
/// use zd_helpers::security::{Aes, Cipher};
///
/// let aes = Aes::new("k");
/// assert_eq!(aes.key(), "8ce4b16b22b58894aa86c421e8759df3");
/// let sealed = aes.encrypt("日本".as_bytes()).unwrap();
/// assert_eq!(aes.decrypt_to_string(&sealed).unwrap(), "日本");
/// ```
#[derive(Clone)]
pub struct Aes {
    key: String,
    cipher: Aes256,
}

impl std::fmt::Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes").finish_non_exhaustive()
    }
}

impl Aes {
    /// Derive the key from `passphrase`.
    #[must_use]
    pub fn new(passphrase: &str) -> Self {
        let key = md5_hex(passphrase);
        let cipher = new_cipher(&key);
        Self { key, cipher }
    }

    /// The derived hex key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Cipher for Aes {
    fn encrypt(&self, data: &[u8]) -> Result<String> {
        let pad = BLOCK_SIZE - data.len() % BLOCK_SIZE;
        let mut buf = Vec::with_capacity(data.len() + pad);
        buf.extend_from_slice(data);
        buf.resize(data.len() + pad, pad as u8);
        encrypt_blocks(&self.cipher, &mut buf);
        Ok(STANDARD.encode(buf))
    }

    fn decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let mut buf = decode_base64(data)?;
        if buf.is_empty() {
            return Err(Error::crypto("empty ciphertext"));
        }
        decrypt_blocks(&self.cipher, &mut buf)?;
        let pad = usize::from(buf[buf.len() - 1]);
        let valid = (1..=BLOCK_SIZE).contains(&pad)
            && buf[buf.len() - pad..].iter().all(|&b| usize::from(b) == pad);
        if !valid {
            crate::log::debug!("aes: bad padding, wrong key or corrupted input");
            return Err(Error::crypto("invalid padding"));
        }
        buf.truncate(buf.len() - pad);
        Ok(buf)
    }
}

/// AES-256 keyed with the 32 ASCII bytes of a hex digest.
pub(super) fn new_cipher(hex_key: &str) -> Aes256 {
    // md5 hex is always 32 bytes, the exact AES-256 key size
    Aes256::new(hex_key.as_bytes().into())
}

/// Encrypt whole blocks in place. `buf.len()` must be a multiple of 16.
pub(super) fn encrypt_blocks(cipher: &Aes256, buf: &mut [u8]) {
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block(chunk.into());
    }
}

/// Decrypt whole blocks in place.
pub(super) fn decrypt_blocks(cipher: &Aes256, buf: &mut [u8]) -> Result<()> {
    if buf.len() % BLOCK_SIZE != 0 {
        return Err(Error::crypto(format!(
            "ciphertext length {} is not a multiple of {BLOCK_SIZE}",
            buf.len()
        )));
    }
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(chunk.into());
    }
    Ok(())
}
