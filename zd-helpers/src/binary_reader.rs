//! Cursor-based reader over an immutable byte buffer.
//!
//! [`BinaryReader`] walks a byte string one step at a time or jumps around
//! with [`seek`](BinaryReader::seek), decodes big-endian integers and floats,
//! and offers look-ahead helpers that never move the cursor
//! ([`next_is`](BinaryReader::next_is), [`index_of`](BinaryReader::index_of),
//! [`reverse_count`](BinaryReader::reverse_count)).
//!
//! # Position model
//!
//! The reader starts *before* the first byte: [`position`](BinaryReader::position)
//! is `None` until the first [`next`](BinaryReader::next), [`seek`](BinaryReader::seek)
//! or [`read`](BinaryReader::read). After that it is the index of the last
//! byte consumed, and [`current`](BinaryReader::current) returns that byte.
//! `read(n)` returns the `n` bytes *after* the position.
//!
//! ```
//! use zd_helpers::BinaryReader;
//!
//! let mut reader = BinaryReader::new(vec![0x00, 0x2A, 0xFF, 0xFE, b'o', b'k']);
//! assert_eq!(reader.position(), None);
//! assert_eq!(reader.read_u16().unwrap(), 42);
//! assert_eq!(reader.position(), Some(1));
//! assert_eq!(reader.current(), Some(0x2A));
//!
//! assert_eq!(reader.index_of(b"ok", 0, None), Some(4));
//! reader.seek(3).unwrap();
//! assert!(reader.is(b"\xFEok"));
//! assert_eq!(reader.read_remaining(), b"ok");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// A look-ahead candidate for [`BinaryReader::next_is`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needle<'a> {
    /// Match a single byte.
    Byte(u8),
    /// Match a run of bytes. Empty runs never match.
    Bytes(&'a [u8]),
}

impl From<u8> for Needle<'_> {
    fn from(b: u8) -> Self {
        Self::Byte(b)
    }
}

impl<'a> From<&'a [u8]> for Needle<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Needle<'a> {
    fn from(s: &'a str) -> Self {
        Self::Bytes(s.as_bytes())
    }
}

/// Sequential / random-access reader over an owned byte buffer.
///
/// Equality and hashing consider the content only, not the cursor.
#[derive(Clone, Default)]
pub struct BinaryReader {
    content: Vec<u8>,
    /// Number of consumed bytes; `position == cursor - 1`.
    cursor: usize,
}

impl BinaryReader {
    /// Wrap a byte buffer. The cursor starts before the first byte.
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            cursor: 0,
        }
    }

    /// Copy a byte slice into a new reader.
    #[must_use]
    pub fn from_buffer(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    /// Decode a hex string (surrounding whitespace ignored).
    pub fn from_hex(hex: &str) -> Result<Self> {
        hex::decode(hex.trim())
            .map(Self::new)
            .map_err(|e| Error::encoding("hex", e))
    }

    /// Decode a standard, padded base64 string (surrounding whitespace ignored).
    pub fn from_base64(encoded: &str) -> Result<Self> {
        STANDARD
            .decode(encoded.trim())
            .map(Self::new)
            .map_err(|e| Error::encoding("base64", e))
    }

    /// Total buffer length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Index of the current byte, `None` before the first byte.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    #[inline]
    fn signed_position(&self) -> i64 {
        self.cursor as i64 - 1
    }

    /// `position + offset`, or `None` on overflow.
    #[inline]
    fn offset_from_position(&self, offset: isize) -> Option<i64> {
        self.signed_position().checked_add(i64::try_from(offset).ok()?)
    }

    fn out_of_bounds(&self, requested: usize) -> Error {
        Error::OutOfBounds {
            position: self.signed_position(),
            requested,
            len: self.content.len(),
        }
    }

    /// The byte at the current position.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<u8> {
        self.position().and_then(|p| self.read_char(p))
    }

    /// Whether [`next`](Self::next) can advance.
    #[inline]
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.cursor < self.content.len()
    }

    /// Whether the position is past the first byte.
    #[inline]
    #[must_use]
    pub fn can_back(&self) -> bool {
        self.cursor > 1
    }

    /// Whether the cursor can advance without reaching index `limit`.
    #[must_use]
    pub fn can_next_until(&self, limit: usize) -> bool {
        self.cursor < limit && self.can_next()
    }

    /// Jump to absolute index `index`.
    ///
    /// Seeking to the current position is a no-op.
    pub fn seek(&mut self, index: usize) -> Result<()> {
        if self.position() == Some(index) {
            return Ok(());
        }
        if index >= self.content.len() {
            return Err(self.out_of_bounds(index));
        }
        self.cursor = index + 1;
        Ok(())
    }

    /// Move relative to the current position.
    ///
    /// Landing exactly one before the first byte resets the reader.
    pub fn seek_offset(&mut self, offset: isize) -> Result<()> {
        let Some(target) = self.offset_from_position(offset) else {
            return Err(self.out_of_bounds(offset.unsigned_abs()));
        };
        match target {
            -1 => {
                self.reset();
                Ok(())
            },
            t if t < -1 || t >= self.content.len() as i64 => {
                Err(self.out_of_bounds(offset.unsigned_abs()))
            },
            t => self.seek(t as usize),
        }
    }

    /// Advance one byte and return it, or `None` at the end (cursor unchanged).
    pub fn next(&mut self) -> Option<u8> {
        if !self.can_next() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Step back one byte.
    pub fn back(&mut self) -> Result<()> {
        self.seek_offset(-1)
    }

    /// Rewind to before the first byte.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Random access to the byte at `index`.
    #[inline]
    #[must_use]
    pub fn read_char(&self, index: usize) -> Option<u8> {
        self.content.get(index).copied()
    }

    /// Consume the next `len` bytes.
    ///
    /// Fails without moving the cursor when fewer than `len` bytes remain.
    pub fn read(&mut self, len: usize) -> Result<&[u8]> {
        let start = self.cursor;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.content.len())
            .ok_or_else(|| self.out_of_bounds(len))?;
        self.cursor = end;
        Ok(&self.content[start..end])
    }

    /// Consume the next `len` bytes as UTF-8 text.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let start = self.cursor;
        let bytes = self.read(len)?.to_vec();
        String::from_utf8(bytes).map_err(|e| {
            self.cursor = start;
            Error::encoding("utf-8", e)
        })
    }

    /// Read one unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read one signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_u16_as::<BigEndian>()
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_u32_as::<BigEndian>()
    }

    /// Read a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_u64_as::<BigEndian>()
    }

    /// Read a big-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_i16_as::<BigEndian>()
    }

    /// Read a big-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_i32_as::<BigEndian>()
    }

    /// Read a big-endian `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_i64_as::<BigEndian>()
    }

    /// Read a big-endian IEEE-754 single.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_f32_as::<BigEndian>()
    }

    /// Read a big-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_f64_as::<BigEndian>()
    }

    /// Read a `u16` in byte order `B`.
    pub fn read_u16_as<B: ByteOrder>(&mut self) -> Result<u16> {
        Ok(B::read_u16(self.read(2)?))
    }

    /// Read a `u32` in byte order `B`.
    pub fn read_u32_as<B: ByteOrder>(&mut self) -> Result<u32> {
        Ok(B::read_u32(self.read(4)?))
    }

    /// Read a `u64` in byte order `B`.
    pub fn read_u64_as<B: ByteOrder>(&mut self) -> Result<u64> {
        Ok(B::read_u64(self.read(8)?))
    }

    /// Read an `i16` in byte order `B`.
    pub fn read_i16_as<B: ByteOrder>(&mut self) -> Result<i16> {
        Ok(B::read_i16(self.read(2)?))
    }

    /// Read an `i32` in byte order `B`.
    pub fn read_i32_as<B: ByteOrder>(&mut self) -> Result<i32> {
        Ok(B::read_i32(self.read(4)?))
    }

    /// Read an `i64` in byte order `B`.
    pub fn read_i64_as<B: ByteOrder>(&mut self) -> Result<i64> {
        Ok(B::read_i64(self.read(8)?))
    }

    /// Read an `f32` in byte order `B`.
    pub fn read_f32_as<B: ByteOrder>(&mut self) -> Result<f32> {
        Ok(B::read_f32(self.read(4)?))
    }

    /// Read an `f64` in byte order `B`.
    pub fn read_f64_as<B: ByteOrder>(&mut self) -> Result<f64> {
        Ok(B::read_f64(self.read(8)?))
    }

    /// Everything after the current position. Does not move the cursor.
    #[must_use]
    pub fn read_remaining(&self) -> &[u8] {
        &self.content[self.cursor..]
    }

    /// Bytes in `[begin, end)`, clamped to the buffer.
    #[must_use]
    pub fn slice(&self, begin: usize, end: usize) -> &[u8] {
        let len = self.content.len();
        let begin = begin.min(len);
        let end = end.clamp(begin, len);
        &self.content[begin..end]
    }

    /// Bytes from the current position (inclusive) up to `end` (exclusive).
    #[must_use]
    pub fn slice_from_position(&self, end: usize) -> &[u8] {
        self.slice(self.position().unwrap_or(0), end)
    }

    /// First index of `needle` at or after `position + offset`.
    ///
    /// Returns `None` when absent or when the match starts past `end`.
    /// An empty needle matches at the search start.
    #[must_use]
    pub fn index_of(&self, needle: &[u8], offset: isize, end: Option<usize>) -> Option<usize> {
        let start = self.offset_from_position(offset)?.max(0);
        let start = usize::try_from(start).ok().filter(|&s| s <= self.content.len())?;
        let found = if needle.is_empty() {
            Some(start)
        } else {
            self.content[start..]
                .windows(needle.len())
                .position(|w| w == needle)
                .map(|i| i + start)
        };
        found.filter(|&i| end.is_none_or(|limit| i <= limit))
    }

    /// Whether the content starting at the current position equals `needle`.
    #[must_use]
    pub fn is(&self, needle: &[u8]) -> bool {
        let Some(pos) = self.position() else {
            return false;
        };
        !needle.is_empty() && self.content.get(pos..pos + needle.len()) == Some(needle)
    }

    /// Index of the first candidate that matches right after the position.
    #[must_use]
    pub fn next_is(&self, items: &[Needle<'_>]) -> Option<usize> {
        if !self.can_next() {
            return None;
        }
        let at = self.cursor;
        items.iter().position(|item| match *item {
            Needle::Byte(b) => self.content.get(at) == Some(&b),
            Needle::Bytes(run) => {
                !run.is_empty() && self.content.get(at..at + run.len()) == Some(run)
            },
        })
    }

    /// Earliest occurrence among `items`, as `(index_in_buffer, index_in_items)`.
    ///
    /// Ties go to the candidate listed first. Empty candidates are ignored.
    #[must_use]
    pub fn min_index(&self, items: &[&[u8]]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (i, item) in items.iter().enumerate() {
            if item.is_empty() {
                continue;
            }
            if let Some(found) = self.index_of(item, 0, None)
                && best.is_none_or(|(min, _)| found < min)
            {
                best = Some((found, i));
            }
        }
        best
    }

    /// Walk backwards from `position + offset` down to index 0.
    ///
    /// `visit(byte, index)` returns `true` to stop. The cursor never moves.
    pub fn reverse<F>(&self, offset: isize, visit: F)
    where
        F: FnMut(u8, usize) -> bool,
    {
        let Some(start) = self.offset_from_position(offset) else {
            // only a huge positive offset can overflow; clamp it to the end
            if offset > 0 {
                self.reverse_from(self.content.len(), visit);
            }
            return;
        };
        let Ok(start) = usize::try_from(start) else {
            return;
        };
        self.reverse_from(start, visit);
    }

    fn reverse_from<F>(&self, start: usize, mut visit: F)
    where
        F: FnMut(u8, usize) -> bool,
    {
        if self.content.is_empty() {
            return;
        }
        let start = start.min(self.content.len() - 1);
        for i in (0..=start).rev() {
            if visit(self.content[i], i) {
                break;
            }
        }
    }

    /// How many `byte`s appear consecutively right before the position.
    ///
    /// Useful for escape detection: an odd count of `\\` before a quote means
    /// the quote is escaped.
    #[must_use]
    pub fn reverse_count(&self, byte: u8) -> usize {
        let mut count = 0;
        self.reverse(-1, |b, _| {
            if b != byte {
                return true;
            }
            count += 1;
            false
        });
        count
    }

    /// The underlying bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Consume the reader and return the buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.content
    }
}

impl PartialEq for BinaryReader {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for BinaryReader {}

impl Hash for BinaryReader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content.hash(state);
    }
}

impl AsRef<[u8]> for BinaryReader {
    fn as_ref(&self) -> &[u8] {
        &self.content
    }
}

impl From<Vec<u8>> for BinaryReader {
    fn from(content: Vec<u8>) -> Self {
        Self::new(content)
    }
}

impl From<&[u8]> for BinaryReader {
    fn from(bytes: &[u8]) -> Self {
        Self::from_buffer(bytes)
    }
}

impl From<&str> for BinaryReader {
    fn from(s: &str) -> Self {
        Self::from_buffer(s.as_bytes())
    }
}

impl fmt::Debug for BinaryReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryReader")
            .field("len", &self.content.len())
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::LittleEndian;

    fn reader(s: &str) -> BinaryReader {
        BinaryReader::from(s)
    }

    #[test]
    fn starts_before_first_byte() {
        let r = reader("abc");
        assert_eq!(r.position(), None);
        assert_eq!(r.current(), None);
        assert!(r.can_next());
        assert!(!r.can_back());
    }

    #[test]
    fn next_walks_to_end_then_stops() {
        let mut r = reader("ab");
        assert_eq!(r.next(), Some(b'a'));
        assert_eq!(r.next(), Some(b'b'));
        assert!(!r.can_next());
        assert_eq!(r.next(), None);
        assert_eq!(r.position(), Some(1));
        assert_eq!(r.current(), Some(b'b'));
    }

    #[test]
    fn seek_and_offset() {
        let mut r = reader("hello");
        r.seek(2).unwrap();
        assert_eq!(r.current(), Some(b'l'));
        r.seek_offset(2).unwrap();
        assert_eq!(r.current(), Some(b'o'));
        r.seek_offset(-4).unwrap();
        assert_eq!(r.current(), Some(b'h'));
        r.back().unwrap();
        assert_eq!(r.position(), None);
        assert!(r.back().is_err());
    }

    #[test]
    fn seek_past_end_fails_and_keeps_cursor() {
        let mut r = reader("xy");
        r.next();
        let err = r.seek(5).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { len: 2, .. }));
        assert_eq!(r.position(), Some(0));
    }

    #[test]
    fn read_advances_past_returned_bytes() {
        let mut r = reader("abcdef");
        assert_eq!(r.read(2).unwrap(), b"ab");
        assert_eq!(r.position(), Some(1));
        assert_eq!(r.read(4).unwrap(), b"cdef");
        assert!(!r.can_next());
        assert_eq!(r.read(0).unwrap(), b"");
    }

    #[test]
    fn read_too_many_is_an_error() {
        let mut r = reader("abc");
        r.next();
        let err = r.read(3).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                position: 0,
                requested: 3,
                len: 3
            }
        );
        assert_eq!(r.position(), Some(0));
        assert_eq!(r.read(2).unwrap(), b"bc");
    }

    #[test]
    fn typed_reads_are_big_endian() {
        let mut r = BinaryReader::new(vec![
            0x01, // u8
            0x01, 0x02, // u16
            0x00, 0x00, 0x01, 0x00, // u32
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A, // u64
        ]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_u32().unwrap(), 256);
        assert_eq!(r.read_u64().unwrap(), 42);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn float_reads() {
        let mut bytes = 1.5f32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(-2.25f64).to_be_bytes());
        let mut r = BinaryReader::new(bytes);
        assert!((r.read_f32().unwrap() - 1.5).abs() < f32::EPSILON);
        assert!((r.read_f64().unwrap() + 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn little_endian_variants() {
        let mut r = BinaryReader::new(vec![0x02, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(r.read_u16_as::<LittleEndian>().unwrap(), 0x0102);
        assert_eq!(r.read_i32_as::<LittleEndian>().unwrap(), -1);
    }

    #[test]
    fn signed_reads() {
        let mut r = BinaryReader::new(vec![0xFF, 0xFF, 0xFE]);
        assert_eq!(r.read_i8().unwrap(), -1);
        assert_eq!(r.read_i16().unwrap(), -2);
    }

    #[test]
    fn read_string_rejects_invalid_utf8_without_moving() {
        let mut r = BinaryReader::new(vec![0xC3, 0x28, b'o', b'k']);
        assert!(matches!(
            r.read_string(2),
            Err(Error::InvalidEncoding {
                encoding: "utf-8",
                ..
            })
        ));
        assert_eq!(r.position(), None);
        r.seek(1).unwrap();
        assert_eq!(r.read_string(2).unwrap(), "ok");
    }

    #[test]
    fn remaining_and_slices() {
        let mut r = reader("0123456789");
        assert_eq!(r.read_remaining(), b"0123456789");
        r.seek(3).unwrap();
        assert_eq!(r.read_remaining(), b"456789");
        assert_eq!(r.slice(2, 5), b"234");
        assert_eq!(r.slice(8, 100), b"89");
        assert_eq!(r.slice(5, 2), b"");
        assert_eq!(r.slice_from_position(6), b"345");
    }

    #[test]
    fn can_next_until_limit() {
        let mut r = reader("abcdef");
        assert!(r.can_next_until(3));
        r.seek(1).unwrap();
        assert!(r.can_next_until(3));
        r.seek(2).unwrap();
        assert!(!r.can_next_until(3));
    }

    #[test]
    fn index_of_respects_position_offset_and_end() {
        let mut r = reader("abcabc");
        assert_eq!(r.index_of(b"bc", 0, None), Some(1));
        r.seek(2).unwrap();
        assert_eq!(r.index_of(b"bc", 0, None), Some(4));
        assert_eq!(r.index_of(b"bc", -2, None), Some(1));
        assert_eq!(r.index_of(b"bc", 0, Some(3)), None);
        assert_eq!(r.index_of(b"zz", 0, None), None);
        assert_eq!(r.position(), Some(2));
    }

    #[test]
    fn is_matches_from_current_byte() {
        let mut r = reader("<!--x-->");
        assert!(!r.is(b"<"));
        r.next();
        assert!(r.is(b"<"));
        assert!(r.is(b"<!--"));
        assert!(!r.is(b"<!-x"));
        assert!(!r.is(b""));
    }

    #[test]
    fn next_is_checks_following_bytes() {
        let mut r = reader("a=>b");
        r.next();
        let items = [Needle::Bytes(b""), Needle::Bytes(b"=="), Needle::from("=>"), Needle::Byte(b'=')];
        assert_eq!(r.next_is(&items), Some(2));
        assert_eq!(r.next_is(&[Needle::Byte(b'=')]), Some(0));
        assert_eq!(r.next_is(&[Needle::Byte(b'x')]), None);
        r.seek(3).unwrap();
        assert_eq!(r.next_is(&items), None);
    }

    #[test]
    fn min_index_prefers_earliest_then_first_listed() {
        let r = reader("xx}yy]zz");
        assert_eq!(r.min_index(&[b"]", b"}"]), Some((2, 1)));
        assert_eq!(r.min_index(&[b"}", b"}y"]), Some((2, 0)));
        assert_eq!(r.min_index(&[b"q", b""]), None);
    }

    #[test]
    fn reverse_visits_backwards_without_moving() {
        let mut r = reader("abcd");
        r.seek(3).unwrap();
        let mut seen = Vec::new();
        r.reverse(-1, |b, i| {
            seen.push((b, i));
            i == 1
        });
        assert_eq!(seen, vec![(b'c', 2), (b'b', 1)]);
        assert_eq!(r.position(), Some(3));
    }

    #[test]
    fn reverse_count_counts_only_consecutive() {
        let mut r = reader(r#"\a\\\""#);
        r.seek(5).unwrap();
        assert_eq!(r.current(), Some(b'"'));
        assert_eq!(r.reverse_count(b'\\'), 3);
        r.seek(1).unwrap();
        assert_eq!(r.reverse_count(b'\\'), 1);
        r.reset();
        assert_eq!(r.reverse_count(b'\\'), 0);
    }

    #[test]
    fn extreme_offsets_fail_without_moving() {
        let mut r = reader("abc");
        assert!(matches!(r.seek_offset(isize::MIN), Err(Error::OutOfBounds { .. })));
        assert_eq!(r.position(), None);

        r.next();
        r.next();
        assert!(matches!(r.seek_offset(isize::MAX), Err(Error::OutOfBounds { .. })));
        assert!(matches!(r.seek_offset(isize::MIN), Err(Error::OutOfBounds { .. })));
        assert_eq!(r.position(), Some(1));

        r.seek(2).unwrap();
        assert_eq!(r.index_of(b"a", isize::MAX, None), None);
        assert_eq!(r.index_of(b"a", isize::MIN, None), Some(0));
        assert_eq!(r.position(), Some(2));
    }

    #[test]
    fn reverse_clamps_extreme_offsets() {
        let mut r = reader("abc");
        r.seek(2).unwrap();
        let mut seen = Vec::new();
        r.reverse(isize::MAX, |_, i| {
            seen.push(i);
            false
        });
        assert_eq!(seen, vec![2, 1, 0]);

        seen.clear();
        r.reverse(isize::MIN, |_, i| {
            seen.push(i);
            false
        });
        assert!(seen.is_empty());
        assert_eq!(r.position(), Some(2));
    }

    #[test]
    fn can_next_until_unbounded_limit() {
        let mut r = reader("abc");
        assert!(r.can_next_until(usize::MAX));
        r.seek(2).unwrap();
        assert!(!r.can_next_until(usize::MAX));
        assert!(!r.can_next_until(0));
    }

    #[test]
    fn constructors() {
        assert_eq!(BinaryReader::from_hex("48 69".replace(' ', "").as_str()).unwrap().as_bytes(), b"Hi");
        assert_eq!(BinaryReader::from_base64("SGk=").unwrap().as_bytes(), b"Hi");
        assert!(matches!(
            BinaryReader::from_hex("zz"),
            Err(Error::InvalidEncoding { encoding: "hex", .. })
        ));
        assert!(matches!(
            BinaryReader::from_base64("%%%"),
            Err(Error::InvalidEncoding {
                encoding: "base64",
                ..
            })
        ));
    }

    #[test]
    fn equality_ignores_cursor() {
        let mut a = reader("same");
        let b = reader("same");
        a.next();
        assert_eq!(a, b);
        assert_ne!(a, reader("other"));
        assert_eq!(a.into_inner(), b"same".to_vec());
    }

    #[test]
    fn empty_buffer_is_inert() {
        let mut r = BinaryReader::default();
        assert!(r.is_empty());
        assert_eq!(r.next(), None);
        assert!(r.read(1).is_err());
        assert_eq!(r.read_remaining(), b"");
        assert_eq!(r.reverse_count(b'a'), 0);
        assert_eq!(r.index_of(b"a", 0, None), None);
    }
}
