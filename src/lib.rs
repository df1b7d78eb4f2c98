//! Builder for PackOnly archives.
//!
//! A PackOnly archive is a fixed 72 byte [`ArchiveHeader`], followed by one 144 byte
//! [`IndexEntry`] per packed file, followed by the file contents in index order. All
//! offsets are known before the first byte is written, so an archive is emitted in a
//! single forward pass.

mod build;
mod error;
mod format;
mod layout;
mod obfuscate;
mod parse;
mod progress;
mod walk;

pub use self::build::{PackBuilder, PackSummary, pack_directory};
pub use self::error::{HeaderError, PackError, PackResult};
pub use self::format::entry::{EntryName, IndexEntry};
pub use self::format::header::ArchiveHeader;
pub use self::layout::{InputFile, PackLayout};
pub use self::obfuscate::{OBFUSCATED_BYTE, is_image_name, obfuscate, should_obfuscate};
pub use self::progress::{NoProgress, Progress, TracingProgress};
pub use self::walk::collect_inputs;
