//! Enumeration of the files below an input directory.

use std::path::Path;
use std::{fs, io};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{PackError, PackResult};
use crate::layout::InputFile;

/// Collects every regular file below `root`.
///
/// Within a directory files come before subdirectories and both are ordered by name, so
/// the resulting order, and with it the archive, is the same on every filesystem.
/// Symbolic links to files are packed with the target's contents, links to directories
/// are not descended into.
pub fn collect_inputs(root: impl AsRef<Path>) -> PackResult<Vec<InputFile>> {
    let root = root.as_ref();
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PackError::NotADirectory(root.to_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PackError::InputNotFound(root.to_owned()));
        }
        Err(e) => return Err(e.into()),
    }

    let walk = WalkDir::new(root).follow_links(false).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut files = Vec::new();
    for entry in walk {
        let entry = entry?;
        let size = if entry.file_type().is_file() {
            entry.metadata()?.len()
        } else if entry.path_is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => target.len(),
                Ok(_) => continue,
                Err(e) => {
                    debug!("skipping dangling link {}: {e}", entry.path().display());
                    continue;
                }
            }
        } else {
            continue;
        };
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = relative_name(relative);
        trace!(name = %name, size, "found file");
        files.push(InputFile { name, path: entry.into_path(), size });
    }

    if files.is_empty() {
        return Err(PackError::EmptyInput);
    }
    Ok(files)
}

/// Converts a relative path to an entry name. Every byte that is not part of a valid
/// UTF-8 sequence becomes one `?`.
#[cfg(unix)]
fn relative_name(relative: &Path) -> String {
    use std::os::unix::ffi::OsStrExt;

    let mut name = String::new();
    for chunk in relative.as_os_str().as_bytes().utf8_chunks() {
        name.push_str(chunk.valid());
        name.extend(chunk.invalid().iter().map(|_| '?'));
    }
    name
}

#[cfg(not(unix))]
fn relative_name(relative: &Path) -> String {
    relative.to_string_lossy().replace(char::REPLACEMENT_CHARACTER, "?")
}
