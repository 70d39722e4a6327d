//! Fixed-width unsigned integer arrays.
//!
//! Logger tags in bulk mode expose their write index and sample area as raw
//! memory blocks. These helpers turn the concatenated block bytes into
//! integers.

use tracing::trace;

/// Width of a single integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintWidth {
    U16,
    U32,
}

impl UintWidth {
    /// Size in bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Byte order of the encoded integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Decode consecutive integers of `width` bytes.
///
/// Trailing bytes that do not fill a whole integer are ignored.
///
/// ```
/// use senseid_parsers::uint::{Endianness, UintWidth, decode_uints};
///
/// let values = decode_uints(&[0x01, 0x00, 0x02, 0x00, 0xFF], UintWidth::U16, Endianness::Little);
/// assert_eq!(values, vec![1, 2]);
/// ```
#[must_use]
pub fn decode_uints(bytes: &[u8], width: UintWidth, endianness: Endianness) -> Vec<u32> {
    let chunks = bytes.chunks_exact(width.bytes());
    if !chunks.remainder().is_empty() {
        trace!(
            "Ignoring {} trailing bytes after {:?} array",
            chunks.remainder().len(),
            width
        );
    }

    chunks
        .map(|chunk| match (width, endianness) {
            (UintWidth::U16, Endianness::Little) => {
                u32::from(u16::from_le_bytes([chunk[0], chunk[1]]))
            }
            (UintWidth::U16, Endianness::Big) => u32::from(u16::from_be_bytes([chunk[0], chunk[1]])),
            (UintWidth::U32, Endianness::Little) => {
                u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
            }
            (UintWidth::U32, Endianness::Big) => {
                u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UintWidth::U16, Endianness::Little, vec![0x0201, 0x0403])]
    #[case(UintWidth::U16, Endianness::Big, vec![0x0102, 0x0304])]
    #[case(UintWidth::U32, Endianness::Little, vec![0x0403_0201])]
    #[case(UintWidth::U32, Endianness::Big, vec![0x0102_0304])]
    fn test_decode_uints(
        #[case] width: UintWidth,
        #[case] endianness: Endianness,
        #[case] expected: Vec<u32>,
    ) {
        assert_eq!(
            decode_uints(&[0x01, 0x02, 0x03, 0x04], width, endianness),
            expected
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        assert_eq!(
            decode_uints(&[0x10, 0x00, 0x00, 0x00, 0xAA, 0xBB], UintWidth::U32, Endianness::Little),
            vec![16]
        );
        assert!(decode_uints(&[0xAA], UintWidth::U16, Endianness::Little).is_empty());
        assert!(decode_uints(&[], UintWidth::U32, Endianness::Big).is_empty());
    }
}
