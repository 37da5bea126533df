//! Cryptographically secure random value generation.
//!
//! All functions draw from the operating system's RNG through the
//! `getrandom` crate, so they are suitable for tokens, secrets, and UUIDs.
//!
//! # Examples
//!
//! ```
//! use zd_helpers::random;
//!
//! let secret = random::bytes(32);
//! assert_eq!(secret.len(), 32);
//!
//! let uuid = random::uuid();
//! assert_eq!(uuid.len(), 36);
//!
//! let token = random::hex(16);
//! assert_eq!(token.len(), 32);
//!
//! let die = random::range(1, 6);
//! assert!((1..=6).contains(&die));
//! ```

/// Fill `buf` from the OS RNG.
///
/// # Panics
///
/// Panics if the OS RNG is unavailable. This indicates a broken platform,
/// not a recoverable condition.
fn fill(buf: &mut [u8]) {
    getrandom::fill(buf).expect("system RNG failure");
}

/// Generate cryptographically secure random bytes.
///
/// ```
/// let key = zd_helpers::random::bytes(32);
/// assert_eq!(key.len(), 32);
/// ```
#[must_use]
pub fn bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    fill(&mut buf);
    buf
}

/// Generate a cryptographically secure random u64.
#[must_use]
pub fn u64() -> u64 {
    let mut buf = [0u8; 8];
    fill(&mut buf);
    u64::from_le_bytes(buf)
}

/// Generate a UUID v4 string.
///
/// Returns a standard UUID v4 format: `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`
/// where `x` is any hexadecimal digit and `y` is one of `8`, `9`, `a`, or `b`.
///
/// ```
/// let id = zd_helpers::random::uuid();
/// assert_eq!(id.len(), 36);
/// assert_eq!(id.chars().nth(14), Some('4'));
/// ```
#[must_use]
pub fn uuid() -> String {
    let mut buf = [0u8; 16];
    fill(&mut buf);

    // Version 4 in the high nibble of byte 6
    buf[6] = (buf[6] & 0x0F) | 0x40;
    // RFC 4122 variant in the high bits of byte 8
    buf[8] = (buf[8] & 0x3F) | 0x80;

    let digits = hex::encode(buf);
    format!(
        "{}-{}-{}-{}-{}",
        &digits[0..8],
        &digits[8..12],
        &digits[12..16],
        &digits[16..20],
        &digits[20..32]
    )
}

/// Generate a random lowercase hexadecimal string of `byte_len * 2` chars.
#[must_use]
pub fn hex(byte_len: usize) -> String {
    hex::encode(bytes(byte_len))
}

/// Uniform integer in `min..=max`. Bounds are swapped when reversed.
///
/// Uses rejection sampling so every value is equally likely.
#[must_use]
pub fn range(min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let span = hi.abs_diff(lo);
    if span == u64::MAX {
        return u64() as i64;
    }
    let size = span + 1;
    // Largest multiple of `size` that fits, so the modulo is unbiased
    let zone = u64::MAX - (u64::MAX % size);
    loop {
        let v = u64();
        if v < zone {
            return lo.wrapping_add((v % size) as i64);
        }
    }
}

/// Uniform index in `0..len`. `len` must be non-zero.
fn index(len: usize) -> usize {
    range(0, len as i64 - 1) as usize
}

/// Shuffle a slice in place (Fisher-Yates).
pub fn shuffle<T>(items: &mut [T]) {
    for i in (1..items.len()).rev() {
        items.swap(i, index(i + 1));
    }
}
