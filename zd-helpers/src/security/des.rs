use ::aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::aes::{BLOCK_SIZE, decrypt_blocks, encrypt_blocks, new_cipher};
use super::{Cipher, decode_base64, md5_hex};
use crate::error::Result;

/// Zero-padded AES-256-ECB with a 16-byte block.
///
/// Ciphertexts are not interchangeable with 32-byte-block Rijndael
/// (mcrypt `RIJNDAEL_256`) output, and the block size is fixed. Trailing
/// NUL bytes of the plaintext do not survive a round trip. Prefer
/// [`super::Aes`] for new data.
///
/// ```
/// use zd_helpers::security::{Cipher, Des};
///
/// let des = Des::new("legacy");
/// let sealed = des.encrypt(b"payload").unwrap();
/// assert_eq!(des.decrypt(&sealed).unwrap(), b"payload");
/// ```
#[derive(Clone)]
pub struct Des {
    key: String,
    cipher: Aes256,
}

impl std::fmt::Debug for Des {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Des").finish_non_exhaustive()
    }
}

impl Des {
    /// Derive the key from `passphrase` (md5 hex, as in [`super::Aes`]).
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

impl Cipher for Des {
    fn encrypt(&self, data: &[u8]) -> Result<String> {
        let mut buf = data.to_vec();
        buf.resize(data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, 0);
        encrypt_blocks(&self.cipher, &mut buf);
        Ok(STANDARD.encode(buf))
    }

    fn decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let mut buf = decode_base64(data)?;
        decrypt_blocks(&self.cipher, &mut buf)?;
        let end = buf.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        buf.truncate(end);
        Ok(buf)
    }
}
