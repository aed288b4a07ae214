//! Event filter: decide whether a raw event marks a directory as changed.
//!
//! Kernel directory-watch facilities emit both an event for the changed
//! entry and a companion event on the containing directory. Without this
//! filter the change set accumulates duplicate directory-level noise at high
//! volume, so the discard policy here must be applied exactly.

use std::path::{Path, PathBuf};

use crate::event::ChangeEvent;

/// Decide whether `event` should mark a directory as changed.
///
/// Returns the owning directory (the parent of the reported path) when the
/// event carries signal, `None` when it is noise.
///
/// Discard rules:
/// - empty subject: the event is about the watched directory itself, not an
///   entry inside it
/// - a directory flagged closed-after-write or modified: the kernel's own
///   companion notification for a change inside that directory, already
///   captured by the inner entry's event
pub fn changed_directory(event: &ChangeEvent) -> Option<PathBuf> {
    if event.subject.is_empty() {
        return None;
    }

    if event.flags.is_directory && (event.flags.closed_write || event.flags.modified) {
        return None;
    }

    event.absolute_path.parent().map(Path::to_path_buf)
}
