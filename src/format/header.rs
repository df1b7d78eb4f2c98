use core::fmt;

use crate::error::{HeaderError, HeaderResult};
use crate::parse::{array, le_u32};

const PACK_MAGIC: &[u8; 8] = b"PackOnly";

/// The in-file header layout.
#[cfg_attr(not(test), allow(dead_code))]
#[repr(C, packed)]
#[derive(Copy, Clone)]
struct CArchiveHeader {
    magic: [u8; 8],
    reserved: [u8; 56],
    entry_count: u32,
    pad: u32,
}

/// The archive header. The trailing pad word is not represented, it is always written
/// as zero.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub magic: [u8; 8],
    pub reserved: [u8; 56],
    pub entry_count: u32,
}

impl Default for ArchiveHeader {
    fn default() -> Self {
        ArchiveHeader { magic: *PACK_MAGIC, reserved: [0; 56], entry_count: 0 }
    }
}

impl ArchiveHeader {
    pub const HEADER_LEN: usize = size_of::<CArchiveHeader>();

    pub fn new(entry_count: u32) -> Self {
        ArchiveHeader { entry_count, ..Default::default() }
    }

    /// Returns an error if the magic does not identify a PackOnly archive.
    pub fn validate_magic(&self) -> HeaderResult<()> {
        if &self.magic != PACK_MAGIC {
            Err(HeaderError::InvalidMagic(self.magic))
        } else {
            Ok(())
        }
    }

    pub fn parse(buffer: &[u8; Self::HEADER_LEN]) -> Self {
        let (magic, buffer) = buffer.split_at(8);
        let (reserved, buffer) = buffer.split_at(56);
        let (entry_count, _pad) = buffer.split_at(4);
        Self {
            magic: array(magic),
            reserved: array(reserved),
            entry_count: le_u32(&array(entry_count)),
        }
    }

    pub fn write_into(&self, buffer: &mut [u8; Self::HEADER_LEN]) {
        let (magic, buffer) = buffer.split_at_mut(8);
        let (reserved, buffer) = buffer.split_at_mut(56);
        let (entry_count, pad) = buffer.split_at_mut(4);
        magic.copy_from_slice(&self.magic);
        reserved.copy_from_slice(&self.reserved);
        entry_count.copy_from_slice(&self.entry_count.to_le_bytes());
        pad.copy_from_slice(&0u32.to_le_bytes());
    }
}

impl fmt::Debug for ArchiveHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArchiveHeader")
            .field("magic", &String::from_utf8_lossy(&self.magic))
            .field("reserved", &"\"...\"")
            .field("entry_count", &self.entry_count)
            .finish()
    }
}
