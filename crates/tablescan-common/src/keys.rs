//! Row key type for table scans.
//!
//! Row keys are variable-length byte sequences compared lexicographically,
//! matching the ordering the store uses for its on-disk layout.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use bytes::Bytes;

/// A row key.
///
/// Keys are opaque byte sequences. The total order is byte-lexicographic:
/// keys are compared byte by byte, and a shorter key sorts before a longer
/// key that shares its prefix.
///
/// # Example
///
/// ```rust
/// use tablescan_common::RowKey;
///
/// let a = RowKey::from_bytes(b"a");
/// let ab = RowKey::from_bytes(b"ab");
/// assert!(a < ab);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RowKey(Bytes);

impl RowKey {
    /// Creates an empty key.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Creates a key from a byte slice.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    /// Creates a key from owned bytes.
    #[inline]
    #[must_use]
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Self(Bytes::from(vec))
    }

    /// Creates a key from a `Bytes` instance.
    #[inline]
    #[must_use]
    pub const fn from_raw(bytes: Bytes) -> Self {
        Self(bytes)
    }

    /// Returns the length of the key in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the smallest key strictly greater than this one.
    ///
    /// The successor is formed by appending a single zero byte. Under the
    /// byte-lexicographic order no key can fall between `k` and `k + 0x00`,
    /// so using the result as an *inclusive* scan start is equivalent to an
    /// exclusive start at `k`. The last byte is never incremented; appending
    /// keeps the computation correct when the key ends in `0xFF`.
    #[must_use]
    pub fn scan_successor(&self) -> Self {
        let mut bytes = Vec::with_capacity(self.0.len() + 1);
        bytes.extend_from_slice(&self.0);
        bytes.push(0x00);
        Self::from_vec(bytes)
    }
}

impl Deref for RowKey {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for RowKey {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Ord for RowKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for RowKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowKey({self})")
    }
}

impl fmt::Display for RowKey {
    /// Renders printable ASCII bytes as-is and everything else as `\xNN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0.iter() {
            if (0x20..=0x7e).contains(&byte) && byte != b'\\' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl From<&[u8]> for RowKey {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for RowKey {
    #[inline]
    fn from(vec: Vec<u8>) -> Self {
        Self::from_vec(vec)
    }
}

impl From<&str> for RowKey {
    #[inline]
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<Bytes> for RowKey {
    #[inline]
    fn from(bytes: Bytes) -> Self {
        Self::from_raw(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_creation() {
        let key = RowKey::from_bytes(b"test");
        assert_eq!(key.len(), 4);
        assert_eq!(key.as_bytes(), b"test");

        let key2: RowKey = "test".into();
        assert_eq!(key, key2);

        assert!(RowKey::empty().is_empty());
    }

    #[test]
    fn test_key_ordering() {
        let a = RowKey::from_bytes(b"aaa");
        let b = RowKey::from_bytes(b"bbb");
        let aa = RowKey::from_bytes(b"aa");

        assert!(a < b);
        assert!(aa < a);
    }

    #[test]
    fn test_scan_successor_appends_zero() {
        let key = RowKey::from_bytes(&[0x41, 0x42]);
        let succ = key.scan_successor();
        assert_eq!(succ.as_bytes(), &[0x41, 0x42, 0x00]);
        assert!(succ > key);
    }

    #[test]
    fn test_scan_successor_never_increments() {
        // Appending keeps 0xFF-terminated keys correct: the next possible
        // key after [0xFF] is [0xFF, 0x00], not [0x01, 0x00].
        let key = RowKey::from_bytes(&[0xFF]);
        let succ = key.scan_successor();
        assert_eq!(succ.as_bytes(), &[0xFF, 0x00]);

        let between = RowKey::from_bytes(&[0xFF, 0x00]);
        assert!(succ <= between);
    }

    #[test]
    fn test_successor_is_immediate() {
        // No key may order strictly between a key and its successor.
        let key = RowKey::from_bytes(b"abc");
        let succ = key.scan_successor();
        assert!(succ > key);
        assert_eq!(succ.as_bytes(), b"abc\x00");
    }

    #[test]
    fn test_display_escapes_binary() {
        let key = RowKey::from_bytes(b"ok");
        assert_eq!(key.to_string(), "ok");

        let key = RowKey::from_bytes(&[0x41, 0x00, 0xFF]);
        assert_eq!(key.to_string(), "A\\x00\\xFF");
    }
}
