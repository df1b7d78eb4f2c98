use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use crate::parse::{array, le_u32};

const NAME_FIELD_LEN: usize = 128;

/// The in-file layout of a single index record.
#[cfg_attr(not(test), allow(dead_code))]
#[repr(C, packed)]
#[derive(Copy, Clone)]
struct RawIndexEntry {
    name: [u8; NAME_FIELD_LEN],
    offset: u32,
    _pad0: u32,
    length: u32,
    _pad1: u32,
}

/// The fixed 128 byte name field of an index record.
///
/// The field always holds at most [`EntryName::MAX_ENCODED_LEN`] encoded bytes followed
/// by at least one NUL.
#[derive(Clone, PartialEq, Eq)]
pub struct EntryName([u8; NAME_FIELD_LEN]);

impl EntryName {
    pub const FIELD_LEN: usize = NAME_FIELD_LEN;
    pub const MAX_ENCODED_LEN: usize = Self::FIELD_LEN - 1;

    /// Encodes `name` into the name field, truncating the encoded form to
    /// [`EntryName::MAX_ENCODED_LEN`] bytes.
    ///
    /// Characters that have no representation in the archive's encoding are replaced by `?`.
    pub fn encode(name: &str) -> Self {
        let encoded = encode_name(name);
        let len = encoded.len().min(Self::MAX_ENCODED_LEN);
        let mut field = [0; Self::FIELD_LEN];
        field[..len].copy_from_slice(&encoded[..len]);
        EntryName(field)
    }

    /// The raw field as stored on disk.
    pub fn field(&self) -> &[u8; Self::FIELD_LEN] {
        &self.0
    }

    /// The encoded name up to the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        &self.0[..end]
    }

    pub fn decode(&self) -> Cow<'_, str> {
        decode_name(self.as_bytes())
    }
}

impl fmt::Debug for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.decode(), f)
    }
}

/// Pairs of (JIS X 0208 code point, code point `encoding_rs` uses for the same
/// Shift_JIS bytes). `encoding_rs` implements the Windows flavour of Shift_JIS, while
/// archive names use plain JIS X 0208 mappings.
#[cfg(feature = "shift-jis")]
const JIS_X0208_REMAP: [(char, char); 6] = [
    ('\u{301C}', '\u{FF5E}'), // wave dash
    ('\u{2016}', '\u{2225}'), // double vertical line
    ('\u{2212}', '\u{FF0D}'), // minus sign
    ('\u{00A2}', '\u{FFE0}'), // cent sign
    ('\u{00A3}', '\u{FFE1}'), // pound sign
    ('\u{00AC}', '\u{FFE2}'), // not sign
];

/// Maps `c` to the character `encoding_rs` encodes to the JIS X 0208 bytes of `c`,
/// `None` if plain Shift_JIS has no representation for it.
#[cfg(feature = "shift-jis")]
fn to_windows_variant(c: char) -> Option<char> {
    if c == '\u{0080}' {
        return None;
    }
    for (jis, windows) in JIS_X0208_REMAP {
        if c == jis {
            return Some(windows);
        }
        // U+2212 and U+FF0D share bytes in the Windows variant, only the former is JIS.
        if c == windows {
            return None;
        }
    }
    Some(c)
}

/// Lead bytes of the JIS X 0208 rows. Everything else with a trail byte belongs to the
/// NEC and IBM vendor extensions.
#[cfg(feature = "shift-jis")]
fn is_jis_x0208_lead(lead: u8) -> bool {
    matches!(lead, 0x81..=0x84 | 0x88..=0x9F | 0xE0..=0xEA)
}

#[cfg(feature = "shift-jis")]
fn encode_name(name: &str) -> Cow<'_, [u8]> {
    use encoding_rs::{EncoderResult, SHIFT_JIS};

    let mut encoder = SHIFT_JIS.new_encoder();
    let mut out = Vec::with_capacity(name.len());
    let mut utf8 = [0; 4];
    let mut buf = [0; 8];
    for c in name.chars() {
        let Some(c) = to_windows_variant(c) else {
            out.push(b'?');
            continue;
        };
        let (result, _, written) =
            encoder.encode_from_utf8_without_replacement(c.encode_utf8(&mut utf8), &mut buf, false);
        match (result, &buf[..written]) {
            (EncoderResult::InputEmpty, &[lead, _]) if !is_jis_x0208_lead(lead) => out.push(b'?'),
            (EncoderResult::InputEmpty, bytes) => out.extend_from_slice(bytes),
            _ => out.push(b'?'),
        }
    }
    Cow::Owned(out)
}

#[cfg(not(feature = "shift-jis"))]
fn encode_name(name: &str) -> Cow<'_, [u8]> {
    Cow::Borrowed(name.as_bytes())
}

#[cfg(feature = "shift-jis")]
fn decode_name(bytes: &[u8]) -> Cow<'_, str> {
    let decoded = encoding_rs::SHIFT_JIS.decode_without_bom_handling(bytes).0;
    let from_windows = |c: char| {
        JIS_X0208_REMAP.iter().find(|&&(_, windows)| windows == c).map_or(c, |&(jis, _)| jis)
    };
    if decoded.chars().any(|c| from_windows(c) != c) {
        Cow::Owned(decoded.chars().map(from_windows).collect())
    } else {
        decoded
    }
}

#[cfg(not(feature = "shift-jis"))]
fn decode_name(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// One record of the index table, describing where a file's data lives in the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: EntryName,
    /// Absolute offset of the data from the start of the archive.
    pub offset: u32,
    pub length: u32,
}

impl IndexEntry {
    pub const ENTRY_LEN: usize = size_of::<RawIndexEntry>();

    pub fn new(name: &str, offset: u32, length: u32) -> Self {
        IndexEntry { name: EntryName::encode(name), offset, length }
    }

    /// The byte range of this entry's data block within the archive.
    pub fn data_range(&self) -> Range<u64> {
        let start = u64::from(self.offset);
        start..start + u64::from(self.length)
    }

    pub fn parse(buffer: &[u8; Self::ENTRY_LEN]) -> Self {
        let (name, buffer) = buffer.split_at(EntryName::FIELD_LEN);
        let (offset, buffer) = buffer.split_at(4);
        let (_pad0, buffer) = buffer.split_at(4);
        let (length, _pad1) = buffer.split_at(4);
        IndexEntry {
            name: EntryName(array(name)),
            offset: le_u32(&array(offset)),
            length: le_u32(&array(length)),
        }
    }

    pub fn write_to(&self, buffer: &mut [u8; Self::ENTRY_LEN]) {
        buffer[..NAME_FIELD_LEN].copy_from_slice(&self.name.0);
        buffer[128..132].copy_from_slice(&self.offset.to_le_bytes());
        buffer[132..136].copy_from_slice(&0u32.to_le_bytes());
        buffer[136..140].copy_from_slice(&self.length.to_le_bytes());
        buffer[140..144].copy_from_slice(&0u32.to_le_bytes());
    }
}
