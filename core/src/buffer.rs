//! Owned, length-tagged byte storage for key material crossing the boundary
//!
//! A [`ByteBuffer`] owns its allocation and releases it exactly once, either
//! through [`ByteBuffer::release`] or when it goes out of scope. Contents are
//! zeroized on release. Borrowed views never outlive the buffer:
//!
//! ```compile_fail
//! use hydrobuf_core::ByteBuffer;
//!
//! let buf = ByteBuffer::from_bytes(b"secret");
//! buf.release();
//! let _ = buf.len();
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::MAX_BUFFER_LEN;
use crate::{Error, Result};

/// Contiguous owned bytes with an explicit length
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ByteBuffer {
    data: Vec<u8>,
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl ByteBuffer {
    /// Allocate `size` zeroed bytes, bounded by [`MAX_BUFFER_LEN`]
    pub fn allocate(size: usize) -> Result<Self> {
        Self::allocate_bounded(size, MAX_BUFFER_LEN)
    }

    /// Allocate `size` zeroed bytes, failing if `size` exceeds `limit` or the
    /// allocator cannot satisfy the request
    pub fn allocate_bounded(size: usize, limit: usize) -> Result<Self> {
        if size > limit {
            return Err(Error::Allocation { requested: size });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::Allocation { requested: size })?;
        data.resize(size, 0);

        tracing::trace!(size, "allocated buffer");
        Ok(Self { data })
    }

    /// Copy a byte sequence into a new buffer
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }

    /// Copy a fixed-size field into a freshly allocated buffer of exactly `N` bytes
    pub(crate) fn from_array<const N: usize>(bytes: &[u8; N]) -> Result<Self> {
        let mut buf = Self::allocate(N)?;
        buf.data.copy_from_slice(bytes);
        Ok(buf)
    }

    /// Parse a hex string (as produced by [`ByteBuffer::to_hex`])
    pub fn from_hex(s: &str) -> Result<Self> {
        let data = hex::decode(s).map_err(|e| Error::Encoding(e.to_string()))?;
        Ok(Self { data })
    }

    /// Parse a standard base64 string
    pub fn from_base64(s: &str) -> Result<Self> {
        let data = BASE64.decode(s).map_err(|e| Error::Encoding(e.to_string()))?;
        Ok(Self { data })
    }

    /// Copy the contents out as a native byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Lowercase hex, two digits per byte, no prefix or separators
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// Number of bytes held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the storage for the duration of a call
    pub fn raw_view(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the storage, e.g. as an output parameter
    pub fn raw_view_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrow the storage as a fixed-size array
    pub fn fixed_view<const N: usize>(&self) -> Result<&[u8; N]> {
        let actual = self.data.len();
        self.data
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength { expected: N, actual })
    }

    /// Mutably borrow the storage as a fixed-size array
    pub fn fixed_view_mut<const N: usize>(&mut self) -> Result<&mut [u8; N]> {
        let actual = self.data.len();
        self.data
            .as_mut_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength { expected: N, actual })
    }

    /// Zeroize and free the storage
    pub fn release(self) {
        tracing::trace!(size = self.data.len(), "released buffer");
        drop(self);
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

// Serialize as a bare base64 string (not a struct)
impl Serialize for ByteBuffer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for ByteBuffer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let buf = ByteBuffer::allocate(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.raw_view().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_allocate_empty() {
        let buf = ByteBuffer::allocate(0).unwrap();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.to_bytes().is_empty());
        assert_eq!(buf.to_hex(), "");
    }

    #[test]
    fn test_allocate_over_limit() {
        let result = ByteBuffer::allocate_bounded(33, 32);
        assert!(matches!(result, Err(Error::Allocation { requested: 33 })));
    }

    #[test]
    fn test_allocate_unsatisfiable() {
        let result = ByteBuffer::allocate_bounded(usize::MAX, usize::MAX);
        assert!(matches!(result, Err(Error::Allocation { .. })));
    }

    #[test]
    fn test_to_bytes_does_not_consume() {
        let buf = ByteBuffer::from_bytes(&[1, 2, 3]);
        assert_eq!(buf.to_bytes(), vec![1, 2, 3]);
        assert_eq!(buf.to_bytes(), vec![1, 2, 3]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_to_hex_lowercase() {
        let buf = ByteBuffer::from_bytes(&[0x00, 0x0f, 0xab, 0xff]);
        assert_eq!(buf.to_hex(), "000fabff");
    }

    #[test]
    fn test_from_hex_rejects_odd_length() {
        assert!(matches!(ByteBuffer::from_hex("abc"), Err(Error::Encoding(_))));
        assert!(matches!(ByteBuffer::from_hex("zz"), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = ByteBuffer::from_bytes(&[7; 4]);
        let mut copy = original.clone();
        copy.raw_view_mut()[0] = 0;
        assert_eq!(original.raw_view(), &[7, 7, 7, 7]);
        assert_eq!(copy.raw_view(), &[0, 7, 7, 7]);
    }

    #[test]
    fn test_fixed_view() {
        let mut buf = ByteBuffer::allocate(4).unwrap();
        buf.fixed_view_mut::<4>().unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buf.fixed_view::<4>().unwrap(), &[1, 2, 3, 4]);

        let err = buf.fixed_view::<32>().unwrap_err();
        assert!(matches!(err, Error::InvalidLength { expected: 32, actual: 4 }));
    }

    #[test]
    fn test_from_array_exact_length() {
        let buf = ByteBuffer::from_array(&[9u8; 32]).unwrap();
        assert_eq!(buf.len(), 32);
        assert_eq!(buf.raw_view(), &[9u8; 32]);
    }

    #[test]
    fn test_debug_hides_contents() {
        let buf = ByteBuffer::from_bytes(&[0xde, 0xad]);
        let debug = format!("{:?}", buf);
        assert!(debug.contains("len: 2"));
        assert!(!debug.contains("222"));
        assert!(!debug.contains("dead"));
    }

    #[test]
    fn test_serde_as_base64_string() {
        let buf = ByteBuffer::from_bytes(b"hydrogen");
        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, "\"aHlkcm9nZW4=\"");

        let decoded: ByteBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn test_release() {
        let buf = ByteBuffer::from_bytes(b"short-lived");
        buf.release();
    }
}
