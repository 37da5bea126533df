use super::{BASE64_LENIENT, Cipher, decode_base64, md5_hex};
use crate::error::Result;
use base64::Engine;

/// Length of the md5 checksum prefix.
const CHECKSUM_LEN: usize = 8;

/// RC4 keystream cipher with an integrity prefix.
///
/// The plaintext is prefixed with the first 8 hex chars of
/// `md5(plaintext + key)`, run through RC4 keyed by the md5 hex of the
/// passphrase, and base64-encoded without padding. Decrypting with the
/// wrong key or tampered input yields an empty result, not an error.
///
/// ```
/// use zd_helpers::security::{Cipher, Encrypt};
///
/// let enc = Encrypt::new("secret");
/// let sealed = enc.encrypt(b"user=42").unwrap();
/// assert!(!sealed.ends_with('='));
/// assert_eq!(enc.decrypt(&sealed).unwrap(), b"user=42");
/// assert!(Encrypt::new("other").decrypt(&sealed).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Encrypt {
    key: String,
}

impl Encrypt {
    /// Derive the key from `passphrase`.
    #[must_use]
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: md5_hex(passphrase),
        }
    }

    /// The derived hex key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn checksum(&self, data: &[u8]) -> String {
        let mut salted = Vec::with_capacity(data.len() + self.key.len());
        salted.extend_from_slice(data);
        salted.extend_from_slice(self.key.as_bytes());
        let mut digest = md5_hex(salted);
        digest.truncate(CHECKSUM_LEN);
        digest
    }
}

impl Cipher for Encrypt {
    fn encrypt(&self, data: &[u8]) -> Result<String> {
        let mut buf = self.checksum(data).into_bytes();
        buf.extend_from_slice(data);
        rc4(self.key.as_bytes(), &mut buf);
        Ok(BASE64_LENIENT.encode(buf))
    }

    fn decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let mut buf = decode_base64(data)?;
        rc4(self.key.as_bytes(), &mut buf);
        if buf.len() < CHECKSUM_LEN
            || buf[..CHECKSUM_LEN] != *self.checksum(&buf[CHECKSUM_LEN..]).as_bytes()
        {
            crate::log::debug!("encrypt: checksum mismatch");
            return Ok(Vec::new());
        }
        Ok(buf.split_off(CHECKSUM_LEN))
    }
}

/// XOR `data` in place with the RC4 keystream for `key`.
fn rc4(key: &[u8], data: &mut [u8]) {
    let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, usize::from(j));
    }

    let (mut a, mut j) = (0u8, 0u8);
    for byte in data.iter_mut() {
        a = a.wrapping_add(1);
        j = j.wrapping_add(state[usize::from(a)]);
        state.swap(usize::from(a), usize::from(j));
        let k = state[usize::from(state[usize::from(a)].wrapping_add(state[usize::from(j)]))];
        *byte ^= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc4_known_vector() {
        // classic "Key" / "Plaintext" vector
        let mut data = *b"Plaintext";
        rc4(b"Key", &mut data);
        assert_eq!(hex::encode(data), "bbf316e8d940af0ad3");
    }

    #[test]
    fn rc4_is_its_own_inverse() {
        let mut data = b"round and round".to_vec();
        rc4(b"k", &mut data);
        rc4(b"k", &mut data);
        assert_eq!(data, b"round and round");
    }

    #[test]
    fn short_input_is_empty() {
        let enc = Encrypt::new("x");
        assert!(enc.decrypt("AAAA").unwrap().is_empty());
        assert!(enc.decrypt("").unwrap().is_empty());
    }

    #[test]
    fn accepts_padded_input() {
        let enc = Encrypt::new("x");
        let sealed = enc.encrypt(b"ab").unwrap();
        let padded = format!("{sealed}{}", "=".repeat((4 - sealed.len() % 4) % 4));
        assert_eq!(enc.decrypt(&padded).unwrap(), b"ab");
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let enc = Encrypt::new("x");
        let sealed = enc.encrypt(b"").unwrap();
        assert_eq!(sealed.len(), 11);
        assert!(enc.decrypt(&sealed).unwrap().is_empty());
    }
}
