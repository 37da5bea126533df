use std::fmt;

use ::rsa::Pkcs1v15Sign;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::{Engine, alphabet};
use hmac::{Hmac, Mac};
use miniserde::json::Value;
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::Rsa;
use crate::error::{Error, JwtError, Result};
use crate::json;

/// URL-safe alphabet, unpadded on write, padding optional on read.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// JWT signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256.
    Hs256,
    /// HMAC with SHA-384.
    Hs384,
    /// HMAC with SHA-512.
    Hs512,
    /// RSA PKCS#1 v1.5 with SHA-256.
    Rs256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    Rs384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    Rs512,
}

impl Algorithm {
    /// Parse a JOSE name, ignoring case.
    ///
    /// ```
    /// use zd_helpers::security::Algorithm;
    ///
    /// assert_eq!(Algorithm::from_name("hs384"), Some(Algorithm::Hs384));
    /// assert_eq!(Algorithm::from_name("none"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "HS256" => Self::Hs256,
            "HS384" => Self::Hs384,
            "HS512" => Self::Hs512,
            "RS256" => Self::Rs256,
            "RS384" => Self::Rs384,
            "RS512" => Self::Rs512,
            _ => return None,
        })
    }

    /// JOSE name as written in the `alg` header.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }

    const fn is_hmac(self) -> bool {
        matches!(self, Self::Hs256 | Self::Hs384 | Self::Hs512)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JSON Web Token encoder and decoder.
///
/// HS algorithms use the shared secret, RS algorithms an [`Rsa`] holding
/// the private key (to sign) or the public key (to verify). A decoder with
/// no key configured skips signature verification and only decodes.
///
/// Verification always uses the configured algorithm, whatever the token
/// header claims.
///
/// ```
/// use zd_helpers::json;
/// use zd_helpers::security::{Algorithm, Jwt};
///
/// let jwt = Jwt::new(Algorithm::Hs256).with_secret("s3cret");
/// let claims = json::decode(r#"{"sub":"42"}"#).unwrap();
/// let token = jwt.encode(&claims).unwrap();
/// assert!(token.starts_with("eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9."));
///
/// let back = jwt.decode(&token).unwrap();
/// assert_eq!(json::encode(&back), r#"{"sub":"42"}"#);
/// ```
#[derive(Clone)]
pub struct Jwt {
    algorithm: Algorithm,
    secret: Option<Vec<u8>>,
    rsa: Option<Rsa>,
}

impl fmt::Debug for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwt")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("rsa", &self.rsa)
            .finish()
    }
}

impl Default for Jwt {
    fn default() -> Self {
        Self::new(Algorithm::Hs256)
    }
}

impl Jwt {
    /// Encoder for `algorithm` with no key.
    #[must_use]
    pub const fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            secret: None,
            rsa: None,
        }
    }

    /// Encoder for a JOSE algorithm name.
    pub fn from_name(name: &str) -> Result<Self> {
        Algorithm::from_name(name)
            .map(Self::new)
            .ok_or(Error::Jwt(JwtError::UnsupportedAlgorithm))
    }

    /// Set the HMAC secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Set the RSA keys.
    #[must_use]
    pub fn with_rsa(mut self, rsa: Rsa) -> Self {
        self.rsa = Some(rsa);
        self
    }

    /// Configured algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn has_key(&self) -> bool {
        self.secret.is_some() || self.rsa.is_some()
    }

    /// Sign `payload` into `header.payload.signature`.
    pub fn encode(&self, payload: &Value) -> Result<String> {
        let header = format!(r#"{{"typ":"JWT","alg":"{}"}}"#, self.algorithm);
        let signing_input = format!(
            "{}.{}",
            BASE64_URL.encode(header),
            BASE64_URL.encode(json::encode(payload))
        );
        let signature = self.sign(signing_input.as_bytes())?;
        Ok(format!("{signing_input}.{}", BASE64_URL.encode(signature)))
    }

    /// Decode `token` and return its payload, verifying the signature when
    /// a key is configured.
    pub fn decode(&self, token: &str) -> Result<Value> {
        let segments: Vec<&str> = token.split('.').collect();
        let [head, body, crypto] = segments[..] else {
            return Err(JwtError::WrongSegmentCount.into());
        };
        let header = decode_segment(head)?;
        let payload = decode_segment(body)?;
        let signature = BASE64_URL
            .decode(crypto)
            .map_err(|_| JwtError::InvalidSegmentEncoding)?;

        if self.has_key() {
            let alg = crate::arr::get(&header, "alg")
                .and_then(json::as_str)
                .filter(|alg| !alg.is_empty())
                .ok_or(JwtError::EmptyAlgorithm)?;
            if Algorithm::from_name(alg).is_none() {
                return Err(JwtError::UnsupportedAlgorithm.into());
            }
            let signing_input = &token[..head.len() + 1 + body.len()];
            if !self.verify(signing_input.as_bytes(), &signature)? {
                crate::log::debug!("jwt: signature mismatch for {}", self.algorithm);
                return Err(JwtError::SignatureMismatch.into());
            }
        }
        Ok(payload)
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        if self.algorithm.is_hmac() {
            return hmac_sign(self.algorithm, self.secret()?, input);
        }
        let (scheme, hashed) = rsa_digest(self.algorithm, input);
        self.rsa()?
            .private_key()?
            .sign(scheme, &hashed)
            .map_err(Error::crypto)
    }

    fn verify(&self, input: &[u8], signature: &[u8]) -> Result<bool> {
        if self.algorithm.is_hmac() {
            let expected = hmac_sign(self.algorithm, self.secret()?, input)?;
            return Ok(constant_time_eq(&expected, signature));
        }
        let (scheme, hashed) = rsa_digest(self.algorithm, input);
        Ok(self
            .rsa()?
            .public_key()?
            .verify(scheme, &hashed, signature)
            .is_ok())
    }

    fn secret(&self) -> Result<&[u8]> {
        self.secret
            .as_deref()
            .ok_or_else(|| Error::key(format!("{} requires a secret", self.algorithm)))
    }

    fn rsa(&self) -> Result<&Rsa> {
        self.rsa
            .as_ref()
            .ok_or_else(|| Error::key(format!("{} requires an rsa key", self.algorithm)))
    }
}

fn decode_segment(segment: &str) -> Result<Value> {
    let bytes = BASE64_URL
        .decode(segment)
        .map_err(|_| JwtError::InvalidSegmentEncoding)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| JwtError::InvalidSegmentEncoding)?;
    match json::decode(text) {
        Ok(Value::Null) | Err(_) => Err(JwtError::InvalidSegmentEncoding.into()),
        Ok(value) => Ok(value),
    }
}

fn hmac_sign(algorithm: Algorithm, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    macro_rules! mac {
        ($hash:ty) => {{
            let mut mac = Hmac::<$hash>::new_from_slice(key).map_err(Error::crypto)?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }};
    }
    Ok(match algorithm {
        Algorithm::Hs384 => mac!(Sha384),
        Algorithm::Hs512 => mac!(Sha512),
        _ => mac!(Sha256),
    })
}

fn rsa_digest(algorithm: Algorithm, input: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match algorithm {
        Algorithm::Rs384 => (Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(input).to_vec()),
        Algorithm::Rs512 => (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(input).to_vec()),
        _ => (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(input).to_vec()),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
