use ::rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use ::rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ::rsa::traits::PublicKeyParts;
use ::rsa::{BigUint, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{Cipher, decode_base64};
use crate::constants::PEM_LINE_WIDTH;
use crate::error::{Error, Result};

/// Minimum number of `0xff` bytes in PKCS#1 v1.5 type-1 padding.
const MIN_PADDING: usize = 8;

/// RSA with PKCS#1 v1.5 padding and base64 ciphertexts.
///
/// Keys are PEM (`PUBLIC KEY`, `RSA PUBLIC KEY`, `PRIVATE KEY`,
/// `RSA PRIVATE KEY`) or bare base64 bodies, which are wrapped at 64
/// columns before parsing. Encrypted private keys are not supported.
///
/// [`Cipher`] encrypts with the public key and decrypts with the private
/// key. [`Rsa::private_encrypt`] and [`Rsa::public_decrypt`] run the other
/// direction with type-1 (signature) padding.
#[derive(Clone, Default)]
pub struct Rsa {
    public: Option<RsaPublicKey>,
    private: Option<RsaPrivateKey>,
}

impl std::fmt::Debug for Rsa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rsa")
            .field("public", &self.public.is_some())
            .field("private", &self.private.is_some())
            .finish()
    }
}

impl Rsa {
    /// No keys loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the public key.
    pub fn with_public_key(mut self, key: &str) -> Result<Self> {
        self.public = Some(load_public(key)?);
        Ok(self)
    }

    /// Load the private key. The public key is derived from it when none
    /// is set yet.
    pub fn with_private_key(mut self, key: &str) -> Result<Self> {
        let private = load_private(key)?;
        if self.public.is_none() {
            self.public = Some(private.to_public_key());
        }
        self.private = Some(private);
        Ok(self)
    }

    /// Key size in bytes, if a key is loaded.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        self.public.as_ref().map(PublicKeyParts::size)
    }

    pub(super) fn public_key(&self) -> Result<&RsaPublicKey> {
        self.public.as_ref().ok_or_else(|| Error::key("public key not set"))
    }

    pub(super) fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.private.as_ref().ok_or_else(|| Error::key("private key not set"))
    }

    /// Encrypt with the public key (type-2 padding).
    pub fn public_encrypt(&self, data: &[u8]) -> Result<String> {
        let mut rng = rand::thread_rng();
        let sealed = self
            .public_key()?
            .encrypt(&mut rng, Pkcs1v15Encrypt, data)
            .map_err(Error::crypto)?;
        Ok(STANDARD.encode(sealed))
    }

    /// Decrypt a [`Rsa::public_encrypt`] result with the private key.
    pub fn private_decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let sealed = decode_base64(data)?;
        self.private_key()?
            .decrypt(Pkcs1v15Encrypt, &sealed)
            .map_err(|err| {
                crate::log::debug!("rsa: private decrypt failed: {err}");
                Error::crypto(err)
            })
    }

    /// "Encrypt" with the private key: type-1 padding over the raw data,
    /// readable by anyone holding the public key.
    pub fn private_encrypt(&self, data: &[u8]) -> Result<String> {
        let sealed = self
            .private_key()?
            .sign(Pkcs1v15Sign::new_unprefixed(), data)
            .map_err(Error::crypto)?;
        Ok(STANDARD.encode(sealed))
    }

    /// Recover data written by [`Rsa::private_encrypt`].
    pub fn public_decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let key = self.public_key()?;
        let sealed = decode_base64(data)?;
        let k = key.size();
        let c = BigUint::from_bytes_be(&sealed);
        if sealed.len() != k || &c >= key.n() {
            return Err(Error::crypto("ciphertext does not match key size"));
        }
        let m = c.modpow(key.e(), key.n()).to_bytes_be();
        // restore leading zeros dropped by the integer conversion
        let mut em = vec![0u8; k.saturating_sub(m.len())];
        em.extend_from_slice(&m);
        strip_type1_padding(&em).ok_or_else(|| {
            crate::log::debug!("rsa: public decrypt found invalid padding");
            Error::crypto("invalid padding")
        })
    }
}

impl Cipher for Rsa {
    fn encrypt(&self, data: &[u8]) -> Result<String> {
        self.public_encrypt(data)
    }

    fn decrypt(&self, data: &str) -> Result<Vec<u8>> {
        self.private_decrypt(data)
    }
}

/// `00 01 ff.. 00 data` → `data`.
fn strip_type1_padding(em: &[u8]) -> Option<Vec<u8>> {
    let rest = em.strip_prefix(&[0x00, 0x01])?;
    let fill = rest.iter().take_while(|&&b| b == 0xff).count();
    if fill < MIN_PADDING || rest.get(fill) != Some(&0x00) {
        return None;
    }
    Some(rest[fill + 1..].to_vec())
}

/// Wrap a bare base64 body at [`PEM_LINE_WIDTH`] columns inside armor.
fn armor(label: &str, body: &str) -> String {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let lines: Vec<&str> = compact
        .as_bytes()
        .chunks(PEM_LINE_WIDTH)
        .filter_map(|line| std::str::from_utf8(line).ok())
        .collect();
    format!("-----BEGIN {label}-----\n{}\n-----END {label}-----", lines.join("\n"))
}

pub(super) fn load_public(key: &str) -> Result<RsaPublicKey> {
    let key = key.trim();
    let pem = if key.contains("PUBLIC KEY") {
        key.to_owned()
    } else {
        armor("PUBLIC KEY", key)
    };
    let parsed = if pem.contains("BEGIN RSA PUBLIC KEY") {
        RsaPublicKey::from_pkcs1_pem(&pem).map_err(Error::key)
    } else {
        RsaPublicKey::from_public_key_pem(&pem).map_err(Error::key)
    };
    parsed.inspect_err(|err| crate::log::debug!("rsa: public key rejected: {err}"))
}

pub(super) fn load_private(key: &str) -> Result<RsaPrivateKey> {
    let key = key.trim();
    let parsed = if key.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(key).map_err(Error::key)
    } else if key.contains("PRIVATE KEY") {
        RsaPrivateKey::from_pkcs8_pem(key).map_err(Error::key)
    } else {
        // bare bodies may be either encoding
        RsaPrivateKey::from_pkcs1_pem(&armor("RSA PRIVATE KEY", key))
            .map_err(Error::key)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(&armor("PRIVATE KEY", key)).map_err(Error::key))
    };
    parsed.inspect_err(|err| crate::log::debug!("rsa: private key rejected: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_wraps_at_64_columns() {
        let body = "A".repeat(130);
        let pem = armor("PUBLIC KEY", &body);
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines.first(), Some(&"-----BEGIN PUBLIC KEY-----"));
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 64);
        assert_eq!(lines[3].len(), 2);
        assert_eq!(lines.last(), Some(&"-----END PUBLIC KEY-----"));
    }

    #[test]
    fn armor_drops_existing_whitespace() {
        assert_eq!(armor("X", "ab\ncd \t"), "-----BEGIN X-----\nabcd\n-----END X-----");
    }

    #[test]
    fn type1_padding() {
        let mut em = vec![0x00, 0x01];
        em.extend([0xff; 8]);
        em.push(0x00);
        em.extend_from_slice(b"hi");
        assert_eq!(strip_type1_padding(&em), Some(b"hi".to_vec()));

        let short = [0x00, 0x01, 0xff, 0x00, b'x'];
        assert_eq!(strip_type1_padding(&short), None);
        assert_eq!(strip_type1_padding(&[0x00, 0x02, 0xff]), None);
    }

    #[test]
    fn missing_keys() {
        let rsa = Rsa::new();
        assert!(matches!(rsa.public_encrypt(b"x"), Err(Error::Key(_))));
        assert!(matches!(rsa.private_encrypt(b"x"), Err(Error::Key(_))));
        assert_eq!(rsa.size(), None);
    }

    #[test]
    fn garbage_key_is_rejected() {
        assert!(matches!(Rsa::new().with_public_key("not a key"), Err(Error::Key(_))));
        assert!(matches!(Rsa::new().with_private_key("bm9wZQ=="), Err(Error::Key(_))));
    }
}
