use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type PackResult<T> = Result<T, PackError>;
pub type HeaderResult<T> = Result<T, HeaderError>;

/// Errors that abort building an archive.
///
/// None of these are recoverable mid-build, any output written before the error is
/// not a valid archive.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("directory does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no files to pack")]
    EmptyInput,

    #[error("too many files for one archive: {0}")]
    TooManyEntries(usize),

    #[error("{name} does not fit into a 32-bit archive (offset {offset}, length {length})")]
    ArchiveTooLarge { name: String, offset: u64, length: u64 },

    #[error("{name} changed size while packing (expected {expected} bytes, read {actual})")]
    SizeChanged { name: String, expected: u64, actual: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("invalid archive magic: expected \"PackOnly\", got {0:?}")]
    InvalidMagic([u8; 8]),
}
