//! Observers notified while an archive is being built.

use tracing::{debug, info};

use crate::build::PackSummary;
use crate::layout::InputFile;

/// Receives progress notifications from a [`PackBuilder`](crate::PackBuilder).
///
/// Notifications carry no format semantics, an implementation may drop them.
pub trait Progress {
    /// Called once the layout is known, before anything is written.
    fn started(&mut self, file_count: usize);
    /// Called right before a file's data block is written.
    fn packing(&mut self, file: &InputFile);
    fn finished(&mut self, summary: &PackSummary);
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn started(&mut self, file_count: usize) {
        (**self).started(file_count)
    }
    fn packing(&mut self, file: &InputFile) {
        (**self).packing(file)
    }
    fn finished(&mut self, summary: &PackSummary) {
        (**self).finished(summary)
    }
}

/// Reports progress as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn started(&mut self, file_count: usize) {
        info!("found {file_count} files");
    }

    fn packing(&mut self, file: &InputFile) {
        info!("packing: {}", file.name);
        debug!(path = %file.path.display(), size = file.size);
    }

    fn finished(&mut self, summary: &PackSummary) {
        info!(entries = summary.entry_count, "archive size: {} bytes", summary.total_len);
    }
}

/// Discards all notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn started(&mut self, _: usize) {}
    fn packing(&mut self, _: &InputFile) {}
    fn finished(&mut self, _: &PackSummary) {}
}
