//! Symmetric and asymmetric cipher wrappers plus JWT.
//!
//! Every cipher implements [`Cipher`]: bytes in, printable text out, and
//! back again.
//!
//! | Type          | Scheme                                                 |
//! |---------------|--------------------------------------------------------|
//! | [`Aes`]       | AES-256-ECB, PKCS#7, base64                            |
//! | [`Des`]       | AES-256-ECB, zero padding, base64 (legacy format)      |
//! | [`Encrypt`]   | RC4 keystream with md5 checksum, unpadded base64       |
//! | [`Encryptor`] | Timestamp-keyed shift of base64 into a 51-char alphabet|
//! | [`Rsa`]       | RSA PKCS#1 v1.5, base64                                |
//!
//! [`Jwt`] signs and verifies tokens with HMAC-SHA2 or RSA.
//!
//! ```
//! use zd_helpers::security::{Aes, Cipher};
//!
//! let aes = Aes::new("secret");
//! let token = aes.encrypt(b"hello").unwrap();
//! assert_eq!(aes.decrypt(&token).unwrap(), b"hello");
//! ```

mod aes;
mod des;
mod encrypt;
mod encryptor;
mod jwt;
mod rsa;


pub use self::aes::Aes;
pub use self::des::Des;
pub use self::encrypt::Encrypt;
pub use self::encryptor::Encryptor;
pub use self::jwt::{Algorithm, Jwt};
pub use self::rsa::Rsa;

use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::{Engine, alphabet};

use crate::error::{Error, Result};

/// A reversible text cipher.
pub trait Cipher {
    /// Encrypt `data` into printable text.
    fn encrypt(&self, data: &[u8]) -> Result<String>;

    /// Reverse [`Cipher::encrypt`].
    fn decrypt(&self, data: &str) -> Result<Vec<u8>>;

    /// Decrypt and require the plaintext to be UTF-8.
    fn decrypt_to_string(&self, data: &str) -> Result<String> {
        String::from_utf8(self.decrypt(data)?).map_err(|err| Error::encoding("utf-8", err))
    }
}

/// Standard alphabet that writes no padding and accepts input with or
/// without it.
pub(crate) const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode standard base64, padded or not. Surrounding whitespace is ignored.
pub(crate) fn decode_base64(data: &str) -> Result<Vec<u8>> {
    BASE64_LENIENT
        .decode(data.trim())
        .map_err(|err| Error::encoding("base64", err))
}

/// Lowercase hex md5 digest.
pub(crate) fn md5_hex(data: impl AsRef<[u8]>) -> String {
    format!("{:x}", md5::compute(data))
}
