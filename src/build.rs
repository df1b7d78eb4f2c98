//! Archive emission.
//!
//! PackOnly layout:
//! - header, 72 bytes:
//!   - [u8 magic[8]] "PackOnly"
//!   - [u8 reserved[56]]
//!   - [u32 entry_count]
//!   - [u32 pad]
//! - index, 144 bytes per entry:
//!   - [u8 name[128]] Shift_JIS, NUL terminated
//!   - [u32 offset] from the start of the archive
//!   - [u32 pad]
//!   - [u32 length]
//!   - [u32 pad]
//! - data blocks, back to back in index order
//!
//! All integers are little-endian.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use tracing::warn;

use crate::error::{PackError, PackResult};
use crate::format::entry::IndexEntry;
use crate::format::header::ArchiveHeader;
use crate::layout::{InputFile, PackLayout};
use crate::obfuscate::obfuscate;
use crate::progress::{Progress, TracingProgress};
use crate::walk::collect_inputs;

/// What a finished build produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackSummary {
    pub entry_count: u32,
    pub total_len: u64,
}

/// Writes archives, reporting to a [`Progress`] sink.
#[derive(Debug, Default)]
pub struct PackBuilder<P = TracingProgress> {
    progress: P,
}

impl<P: Progress> PackBuilder<P> {
    pub fn new(progress: P) -> Self {
        PackBuilder { progress }
    }

    pub fn into_progress(self) -> P {
        self.progress
    }

    /// Packs `files` in the given order into `out`.
    ///
    /// The layout is computed up front, so nothing is written if the file list is empty
    /// or does not fit the format. On any later error `out` holds a truncated archive
    /// which must be discarded.
    pub fn build<W: Write>(&mut self, files: &[InputFile], mut out: W) -> PackResult<PackSummary> {
        let layout = PackLayout::compute(files)?;
        self.progress.started(files.len());

        write_index(&layout, &mut out)?;

        let mut buf = Vec::new();
        for file in files {
            self.progress.packing(file);
            buf.clear();
            File::open(&file.path)?.read_to_end(&mut buf)?;
            if buf.len() as u64 != file.size {
                return Err(PackError::SizeChanged {
                    name: file.name.clone(),
                    expected: file.size,
                    actual: buf.len() as u64,
                });
            }
            obfuscate(&file.name, &mut buf);
            out.write_all(&buf)?;
        }
        out.flush()?;

        let summary =
            PackSummary { entry_count: layout.header().entry_count, total_len: layout.total_len() };
        self.progress.finished(&summary);
        Ok(summary)
    }
}

fn write_index<W: Write>(layout: &PackLayout, out: &mut W) -> io::Result<()> {
    let mut buf = [0; ArchiveHeader::HEADER_LEN];
    layout.header().write_into(&mut buf);
    out.write_all(&buf)?;

    let mut buf = [0; IndexEntry::ENTRY_LEN];
    for entry in layout.entries() {
        entry.write_to(&mut buf);
        out.write_all(&buf)?;
    }
    Ok(())
}

/// Packs every file below `input` into a new archive at `output`.
///
/// Nothing is created if `input` is missing, not a directory or holds no files. If the
/// build fails after `output` was created the partial archive is removed again.
pub fn pack_directory(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    progress: impl Progress,
) -> PackResult<PackSummary> {
    let files = collect_inputs(input)?;
    let output = output.as_ref();
    let out = BufWriter::new(File::create(output)?);

    let result = PackBuilder::new(progress).build(&files, out);
    if result.is_err()
        && let Err(e) = fs::remove_file(output)
    {
        warn!("failed to remove partial archive {}: {e}", output.display());
    }
    result
}
