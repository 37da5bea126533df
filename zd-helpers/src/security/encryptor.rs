use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{Cipher, decode_base64};
use crate::error::{Error, Result};

/// Alphabet size of the scrambled output.
const DICTIONARY_LEN: i32 = 51;
/// Offset subtracted before mapping into the alphabet.
const DICTIONARY_BASE: i32 = 24;
/// Prefix marking a code from the upper half of the alphabet.
const HIGH_PREFIX: u8 = b'0';

/// Time-keyed scrambler simple enough to reimplement in a browser.
///
/// The input is base64-encoded, then each character is shifted down by a
/// digit of the key timestamp (cycling) and mapped into `1-9`, `a-z` and
/// `A-P`. Codes past the first 51 are prefixed with `0`. This obfuscates,
/// it does not protect.
///
/// ```
/// use zd_helpers::security::{Cipher, Encryptor};
///
/// let enc = Encryptor::new(1700000000);
/// assert_eq!(enc.encrypt(b"a").unwrap(), "0ePCC");
/// assert_eq!(enc.decrypt("0ePCC").unwrap(), b"a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encryptor {
    keys: Vec<i32>,
}

impl Encryptor {
    /// Key from the decimal digits of `timestamp`. Zero uses the current
    /// time.
    #[must_use]
    pub fn new(timestamp: i64) -> Self {
        let timestamp = if timestamp == 0 {
            crate::time::now()
        } else {
            timestamp
        };
        let keys = timestamp
            .to_string()
            .chars()
            .map(|c| c.to_digit(10).map_or(0, |d| d as i32))
            .collect();
        Self { keys }
    }

    /// Key from a numeric string or a date accepted by
    /// [`crate::time::parse`].
    pub fn from_date(date: &str) -> Result<Self> {
        let date = date.trim();
        let timestamp = match date.parse::<i64>() {
            Ok(ts) => ts,
            Err(_) => crate::time::parse(date)?,
        };
        Ok(Self::new(timestamp))
    }

    fn key_at(&self, i: usize) -> i32 {
        self.keys[i % self.keys.len()]
    }
}

impl Cipher for Encryptor {
    fn encrypt(&self, data: &[u8]) -> Result<String> {
        let encoded = STANDARD.encode(data);
        let mut out = String::with_capacity(encoded.len() * 2);
        for (i, byte) in encoded.bytes().enumerate() {
            push_code(&mut out, i32::from(byte) - self.key_at(i));
        }
        Ok(out)
    }

    fn decrypt(&self, data: &str) -> Result<Vec<u8>> {
        let bytes = data.as_bytes();
        let mut encoded = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let code = if bytes[i] == HIGH_PREFIX {
                let Some(&next) = bytes.get(i + 1) else {
                    return Err(Error::crypto("truncated scrambled input"));
                };
                i += 2;
                dictionary_key(next) + DICTIONARY_LEN
            } else {
                i += 1;
                dictionary_key(bytes[i - 1])
            };
            let value = code + self.key_at(encoded.len());
            encoded.push(value.rem_euclid(256) as u8);
        }
        let encoded = String::from_utf8(encoded).map_err(|err| Error::encoding("base64", err))?;
        decode_base64(&encoded)
    }
}

fn push_code(out: &mut String, code: i32) {
    let code = code - DICTIONARY_BASE;
    if code >= DICTIONARY_LEN {
        out.push(char::from(HIGH_PREFIX));
    }
    let rate = code.rem_euclid(DICTIONARY_LEN);
    let c = match rate {
        0..9 => rate + 49,
        9..35 => rate + 88,
        _ => rate + 30,
    };
    out.push(char::from(c as u8));
}

fn dictionary_key(c: u8) -> i32 {
    let ord = i32::from(c);
    DICTIONARY_BASE
        + match c {
            ..=b'9' => ord - 49,
            ..=b'Z' => ord - 30,
            _ => ord - 88,
        }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_timestamp_digits() {
        assert_eq!(Encryptor::new(1_234_509).keys, [1, 2, 3, 4, 5, 0, 9]);
        assert_eq!(Encryptor::new(-5).keys, [0, 5]);
        assert_eq!(Encryptor::new(0).keys.len(), crate::time::now().to_string().len());
    }

    #[test]
    fn alphabet_covers_every_base64_char() {
        let enc = Encryptor::new(9_876_543_210);
        let all: Vec<u8> = (0..=255).collect();
        let sealed = enc.encrypt(&all).unwrap();
        assert!(sealed.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert_eq!(enc.decrypt(&sealed).unwrap(), all);
    }

    #[test]
    fn from_date_parses_numbers_and_dates() {
        assert_eq!(Encryptor::from_date("1700000000").unwrap(), Encryptor::new(1_700_000_000));
        assert_eq!(
            Encryptor::from_date("2023-11-14 22:13:20").unwrap(),
            Encryptor::new(1_700_000_000)
        );
        assert!(Encryptor::from_date("someday").is_err());
    }

    #[test]
    fn different_timestamps_differ() {
        let a = Encryptor::new(1_111_111_111).encrypt(b"same").unwrap();
        let b = Encryptor::new(2_222_222_222).encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn truncated_prefix_is_an_error() {
        assert!(Encryptor::new(1).decrypt("0").is_err());
    }
}
