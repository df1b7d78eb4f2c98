//! Offset bookkeeping linking the index table to the data region.

use std::path::PathBuf;

use crate::error::{PackError, PackResult};
use crate::format::entry::IndexEntry;
use crate::format::header::ArchiveHeader;

/// A file to be packed, as handed over by the directory walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    /// Path relative to the input root, this is what ends up in the index.
    pub name: String,
    /// Where to read the contents from.
    pub path: PathBuf,
    /// Size on disk at enumeration time.
    pub size: u64,
}

/// The header and index table of an archive, computed before any data is written.
#[derive(Clone, Debug)]
pub struct PackLayout {
    header: ArchiveHeader,
    entries: Vec<IndexEntry>,
    total_len: u64,
}

impl PackLayout {
    /// Assigns every file a contiguous data block directly after the index table, in the
    /// order given.
    pub fn compute(files: &[InputFile]) -> PackResult<Self> {
        if files.is_empty() {
            return Err(PackError::EmptyInput);
        }
        let entry_count =
            u32::try_from(files.len()).map_err(|_| PackError::TooManyEntries(files.len()))?;

        let mut cursor = Self::data_start_for(files.len());
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let (Ok(offset), Ok(length)) = (u32::try_from(cursor), u32::try_from(file.size))
            else {
                return Err(PackError::ArchiveTooLarge {
                    name: file.name.clone(),
                    offset: cursor,
                    length: file.size,
                });
            };
            entries.push(IndexEntry::new(&file.name, offset, length));
            cursor += file.size;
        }

        Ok(PackLayout { header: ArchiveHeader::new(entry_count), entries, total_len: cursor })
    }

    fn data_start_for(entry_count: usize) -> u64 {
        (ArchiveHeader::HEADER_LEN + IndexEntry::ENTRY_LEN * entry_count) as u64
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Offset of the first data block.
    pub fn data_start(&self) -> u64 {
        Self::data_start_for(self.entries.len())
    }

    /// Size of the complete archive in bytes.
    pub fn total_len(&self) -> u64 {
        self.total_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, size: u64) -> InputFile {
        InputFile { name: name.to_owned(), path: PathBuf::from(name), size }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(PackLayout::compute(&[]), Err(PackError::EmptyInput)));
    }

    #[test]
    fn data_starts_after_index_table() {
        let layout = PackLayout::compute(&[input("a.txt", 30), input("b.png", 10)]).unwrap();
        assert_eq!(layout.header().entry_count, 2);
        assert_eq!(layout.data_start(), 72 + 2 * 144);
        assert_eq!(layout.entries()[0].offset, 360);
        assert_eq!(layout.entries()[0].length, 30);
        assert_eq!(layout.entries()[1].offset, 390);
        assert_eq!(layout.entries()[1].length, 10);
        assert_eq!(layout.total_len(), 400);
    }

    #[test]
    fn blocks_are_contiguous() {
        let files = [input("a", 7), input("b", 0), input("c", 1024), input("d", 3)];
        let layout = PackLayout::compute(&files).unwrap();
        let entries = layout.entries();
        assert_eq!(u64::from(entries[0].offset), layout.data_start());
        for pair in entries.windows(2) {
            assert_eq!(pair[1].offset, pair[0].offset + pair[0].length);
        }
        let last = entries.last().unwrap();
        assert_eq!(layout.total_len(), last.data_range().end);
    }

    #[test]
    fn zero_length_files_share_their_offset_with_the_next_block() {
        let layout = PackLayout::compute(&[input("empty", 0), input("next", 5)]).unwrap();
        assert_eq!(layout.entries()[0].offset, layout.entries()[1].offset);
        assert!(layout.entries()[0].data_range().is_empty());
    }

    #[test]
    fn offsets_past_u32_are_rejected() {
        let files = [input("huge.bin", u64::from(u32::MAX)), input("after.bin", 1)];
        let err = PackLayout::compute(&files).unwrap_err();
        assert!(matches!(err, PackError::ArchiveTooLarge { ref name, offset, .. }
            if name == "after.bin" && offset == 360 + u64::from(u32::MAX)));
    }

    #[test]
    fn lengths_past_u32_are_rejected() {
        let err = PackLayout::compute(&[input("big.bin", 1 << 32)]).unwrap_err();
        assert!(matches!(err, PackError::ArchiveTooLarge { length, .. } if length == 1 << 32));
    }

    #[test]
    fn last_block_may_end_past_u32() {
        let layout = PackLayout::compute(&[input("big.bin", u64::from(u32::MAX))]).unwrap();
        assert_eq!(layout.entries()[0].offset, 216);
        assert_eq!(layout.total_len(), 216 + u64::from(u32::MAX));
    }
}
