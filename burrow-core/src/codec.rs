//! Codepoint-level UTF-8 encoding and decoding.
//!
//! The trie is keyed on raw codepoints, so names and keystrokes are decoded
//! here one codepoint at a time. The encoder accepts anything below 2^21,
//! which is looser than the Unicode ceiling of 0x10FFFF.

use crate::error::BurrowError;
use std::io::Read;

/// Exclusive upper bound accepted by [`encode`].
pub const CODEPOINT_LIMIT: u32 = 1 << 21;

const CONTINUATION_MASK: u8 = 0b1100_0000;
const CONTINUATION_TAG: u8 = 0b1000_0000;

/// One codepoint read from a byte stream, with the bytes it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub codepoint: u32,
    bytes: [u8; 4],
    len: usize,
}

impl Decoded {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Canonical UTF-8 bytes for one codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    bytes: [u8; 4],
    len: usize,
}

impl Encoded {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of bytes `encode` produces for `codepoint`.
pub fn encoded_len(codepoint: u32) -> usize {
    match codepoint {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        _ => 4,
    }
}

/// Read exactly one codepoint from `reader`.
///
/// The sequence length comes from the run of set high bits in the leading
/// byte. Continuation bytes must carry the `10` tag. A reader that runs dry
/// mid-sequence surfaces its own I/O error.
pub fn decode<R: Read + ?Sized>(reader: &mut R) -> crate::Result<Decoded> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes[..1])?;

    let lead = bytes[0];
    let len = match lead.leading_ones() {
        0 => 1,
        n @ 2..=4 => n as usize,
        // Stray continuation byte, or a lead byte no sequence can start with
        _ => return Err(BurrowError::InvalidEncoding { byte: lead }),
    };

    let mut codepoint = if len == 1 {
        lead as u32
    } else {
        (lead & (0x7F >> len)) as u32
    };

    if len > 1 {
        reader.read_exact(&mut bytes[1..len])?;
        for &byte in &bytes[1..len] {
            if byte & CONTINUATION_MASK != CONTINUATION_TAG {
                return Err(BurrowError::InvalidEncoding { byte });
            }
            codepoint = (codepoint << 6) | (byte & !CONTINUATION_MASK) as u32;
        }
    }

    Ok(Decoded {
        codepoint,
        bytes,
        len,
    })
}

/// Encode `codepoint` as canonical UTF-8.
pub fn encode(codepoint: u32) -> crate::Result<Encoded> {
    if codepoint >= CODEPOINT_LIMIT {
        return Err(BurrowError::InvalidCodepoint(codepoint));
    }

    let len = encoded_len(codepoint);
    let mut bytes = [0u8; 4];
    match len {
        1 => bytes[0] = codepoint as u8,
        2 => {
            bytes[0] = 0xC0 | (codepoint >> 6) as u8;
            bytes[1] = continuation(codepoint);
        }
        3 => {
            bytes[0] = 0xE0 | (codepoint >> 12) as u8;
            bytes[1] = continuation(codepoint >> 6);
            bytes[2] = continuation(codepoint);
        }
        _ => {
            bytes[0] = 0xF0 | (codepoint >> 18) as u8;
            bytes[1] = continuation(codepoint >> 12);
            bytes[2] = continuation(codepoint >> 6);
            bytes[3] = continuation(codepoint);
        }
    }

    Ok(Encoded { bytes, len })
}

fn continuation(bits: u32) -> u8 {
    CONTINUATION_TAG | (bits & 0x3F) as u8
}

/// Decode a complete byte string into codepoints.
///
/// A sequence cut short by the end of `bytes` is reported as
/// `InvalidEncoding` on its leading byte.
pub fn codepoints(bytes: &[u8]) -> crate::Result<Vec<u32>> {
    let mut rest = bytes;
    let mut out = Vec::with_capacity(bytes.len());
    while let Some(&lead) = rest.first() {
        match decode(&mut rest) {
            Ok(decoded) => out.push(decoded.codepoint),
            Err(e) if e.is_end_of_input() => {
                return Err(BurrowError::InvalidEncoding { byte: lead });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// Append the UTF-8 encoding of `codepoint` to `buf`.
pub fn push_codepoint(buf: &mut Vec<u8>, codepoint: u32) -> crate::Result<()> {
    buf.extend_from_slice(encode(codepoint)?.as_bytes());
    Ok(())
}

/// Drop the last encoded codepoint from `buf`, returning whether one was removed.
pub fn pop_codepoint(buf: &mut Vec<u8>) -> bool {
    while let Some(byte) = buf.pop() {
        if byte & CONTINUATION_MASK != CONTINUATION_TAG {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_slice(bytes: &[u8]) -> crate::Result<Decoded> {
        let mut reader = bytes;
        decode(&mut reader)
    }

    #[test]
    fn test_roundtrip_known_codepoints() {
        for (codepoint, len) in [(0x41, 1), (0x72, 1), (0x611B, 3)] {
            let encoded = encode(codepoint).unwrap();
            assert_eq!(encoded.len(), len);
            let decoded = decode_slice(encoded.as_bytes()).unwrap();
            assert_eq!(decoded.codepoint, codepoint);
            assert_eq!(decoded.as_bytes(), encoded.as_bytes());
        }
    }

    #[test]
    fn test_encode_matches_std() {
        for c in ['a', 'é', '愛', '🦀'] {
            let mut expected = [0u8; 4];
            let expected = c.encode_utf8(&mut expected).as_bytes();
            assert_eq!(encode(c as u32).unwrap().as_bytes(), expected);
        }
    }

    #[test]
    fn test_length_boundaries() {
        assert_eq!(encoded_len(0x7F), 1);
        assert_eq!(encoded_len(0x80), 2);
        assert_eq!(encoded_len(0x7FF), 2);
        assert_eq!(encoded_len(0x800), 3);
        assert_eq!(encoded_len(0xFFFF), 3);
        assert_eq!(encoded_len(0x10000), 4);
    }

    #[test]
    fn test_encode_limit_is_two_to_the_21() {
        // Above the Unicode ceiling but still accepted
        let encoded = encode(0x1F_FFFF).unwrap();
        assert_eq!(encoded.as_bytes(), &[0xF7, 0xBF, 0xBF, 0xBF]);
        assert_eq!(decode_slice(encoded.as_bytes()).unwrap().codepoint, 0x1F_FFFF);

        assert!(matches!(
            encode(CODEPOINT_LIMIT),
            Err(BurrowError::InvalidCodepoint(0x20_0000))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_continuation() {
        // 0xE6 starts a 3-byte sequence; 0x41 is not a continuation byte
        let err = decode_slice(&[0xE6, 0x41, 0x9B]).unwrap_err();
        assert!(matches!(err, BurrowError::InvalidEncoding { byte: 0x41 }));
    }

    #[test]
    fn test_decode_rejects_stray_continuation() {
        let err = decode_slice(&[0x9B]).unwrap_err();
        assert!(matches!(err, BurrowError::InvalidEncoding { byte: 0x9B }));
        assert!(decode_slice(&[0xF8, 0x80, 0x80, 0x80]).is_err());
    }

    #[test]
    fn test_decode_starved_source() {
        let err = decode_slice(&[0xE6, 0x84]).unwrap_err();
        assert!(err.is_end_of_input());
        assert!(decode_slice(&[]).unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_decode_consumes_one_codepoint() {
        let mut reader: &[u8] = "r愛".as_bytes();
        assert_eq!(decode(&mut reader).unwrap().codepoint, 'r' as u32);
        assert_eq!(decode(&mut reader).unwrap().codepoint, 0x611B);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_codepoints() {
        assert_eq!(
            codepoints("a愛".as_bytes()).unwrap(),
            vec!['a' as u32, 0x611B]
        );
        assert!(matches!(
            codepoints(&[b'a', 0xE6, 0x84]),
            Err(BurrowError::InvalidEncoding { byte: 0xE6 })
        ));
    }

    #[test]
    fn test_pop_codepoint() {
        let mut buf = "x愛".as_bytes().to_vec();
        assert!(pop_codepoint(&mut buf));
        assert_eq!(buf, b"x");
        assert!(pop_codepoint(&mut buf));
        assert!(buf.is_empty());
        assert!(!pop_codepoint(&mut buf));
    }
}
