//! Raw change events produced by the kernel event source.
//!
//! A [`ChangeEvent`] is the normalized shape of one kernel notification. It
//! is transient: the source binding builds it, the filter inspects it, and it
//! is dropped. Nothing downstream of the filter ever stores an event.

use serde::Serialize;
use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode, CreateKind, EventKind, ModifyKind, RemoveKind};

/// Semantic flags the kernel reported for a single path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventFlags {
    /// The reported path is a directory.
    pub is_directory: bool,
    /// The path was created.
    pub created: bool,
    /// The path's content or metadata changed.
    pub modified: bool,
    /// A writable file handle on the path was closed.
    pub closed_write: bool,
    /// The path was removed.
    pub removed: bool,
    /// The path was renamed (either side of a move).
    pub renamed: bool,
}

impl EventFlags {
    /// Whether any recognized event category is set.
    pub fn is_recognized(&self) -> bool {
        self.created || self.modified || self.closed_write || self.removed || self.renamed
    }
}

/// One raw notification from the kernel facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    /// Path relative to the watched root. Empty when the event concerns the
    /// watched directory itself rather than an entry inside it.
    pub subject: String,
    /// Absolute path the kernel reported.
    pub absolute_path: PathBuf,
    /// Semantic flags for this notification.
    pub flags: EventFlags,
}

impl ChangeEvent {
    /// Build an event from its parts.
    pub fn new(
        subject: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        flags: EventFlags,
    ) -> Self {
        Self {
            subject: subject.into(),
            absolute_path: absolute_path.into(),
            flags,
        }
    }
}

/// Compute the subject of `path` relative to the watched roots.
///
/// Picks the deepest root containing `path` so that nested watch roots
/// resolve against the closest one. Returns an empty string when `path`
/// equals a root, `None` when `path` is under no root at all.
pub fn subject_for(path: &Path, roots: &[PathBuf]) -> Option<String> {
    roots
        .iter()
        .filter_map(|root| path.strip_prefix(root).ok().map(|rel| (root, rel)))
        .max_by_key(|(root, _)| root.as_os_str().len())
        .map(|(_, rel)| rel.to_string_lossy().into_owned())
}

/// Convert a notify event into zero or more raw change events, one per
/// reported path.
///
/// Unrecognized kinds (plain reads, catch-all `Any`/`Other`) are dropped
/// here: the watch registration only cares about create, modify, remove,
/// rename, and close-after-write, mirroring the categories a native watch
/// mask would select.
pub fn from_notify(event: &notify::Event, roots: &[PathBuf]) -> Vec<ChangeEvent> {
    if !recognized(&event.kind) {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter_map(|path| {
            let subject = subject_for(path, roots)?;
            Some(ChangeEvent {
                subject,
                absolute_path: path.clone(),
                flags: flags_for(&event.kind, path),
            })
        })
        .collect()
}

fn recognized(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Remove(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

/// Map a notify event kind onto semantic flags for one reported path.
///
/// Directory detection prefers the folder-specific kinds; when the kind does
/// not say (e.g. rename, close-write), a filesystem check fills the gap for
/// paths that still exist.
fn flags_for(kind: &EventKind, path: &Path) -> EventFlags {
    let mut flags = EventFlags::default();

    match kind {
        EventKind::Create(create) => {
            flags.created = true;
            if matches!(create, CreateKind::Folder) {
                flags.is_directory = true;
            }
        }
        EventKind::Modify(ModifyKind::Name(_)) => {
            flags.renamed = true;
        }
        EventKind::Modify(_) => {
            // Data, metadata/attribute, and unclassified modifications all
            // count as "modified" for filtering purposes.
            flags.modified = true;
        }
        EventKind::Remove(remove) => {
            flags.removed = true;
            if matches!(remove, RemoveKind::Folder) {
                flags.is_directory = true;
            }
        }
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            flags.closed_write = true;
        }
        _ => {}
    }

    if !flags.is_directory && !flags.removed && path.is_dir() {
        flags.is_directory = true;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::DataChange;

    fn make_event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> EventKind {
        EventKind::Modify(ModifyKind::Data(DataChange::Any))
    }

    #[test]
    fn test_subject_relative_to_root() {
        let roots = vec![PathBuf::from("/proj/src")];
        let subject = subject_for(Path::new("/proj/src/a.txt"), &roots);
        assert_eq!(subject, Some("a.txt".to_string()));
    }

    #[test]
    fn test_subject_empty_for_root_itself() {
        let roots = vec![PathBuf::from("/proj/src")];
        let subject = subject_for(Path::new("/proj/src"), &roots);
        assert_eq!(subject, Some(String::new()));
    }

    #[test]
    fn test_subject_none_outside_roots() {
        let roots = vec![PathBuf::from("/proj/src")];
        assert_eq!(subject_for(Path::new("/etc/passwd"), &roots), None);
    }

    #[test]
    fn test_subject_prefers_deepest_root() {
        let roots = vec![PathBuf::from("/proj"), PathBuf::from("/proj/src")];
        let subject = subject_for(Path::new("/proj/src/a.txt"), &roots);
        assert_eq!(subject, Some("a.txt".to_string()));
    }

    #[test]
    fn test_from_notify_create_file() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(
            vec!["/proj/src/a.txt"],
            EventKind::Create(CreateKind::File),
        );

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].subject, "a.txt");
        assert!(changes[0].flags.created);
        assert!(!changes[0].flags.is_directory);
    }

    #[test]
    fn test_from_notify_create_folder_sets_directory_flag() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(
            vec!["/proj/src/subdir"],
            EventKind::Create(CreateKind::Folder),
        );

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].flags.is_directory);
        assert!(changes[0].flags.created);
    }

    #[test]
    fn test_from_notify_modify_maps_to_modified() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(vec!["/proj/src/a.txt"], modify_kind());

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].flags.modified);
        assert!(!changes[0].flags.renamed);
    }

    #[test]
    fn test_from_notify_rename_maps_to_renamed() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(
            vec!["/proj/src/old.txt"],
            EventKind::Modify(ModifyKind::Name(notify::event::RenameMode::From)),
        );

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].flags.renamed);
        assert!(!changes[0].flags.modified);
    }

    #[test]
    fn test_from_notify_close_write() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(
            vec!["/proj/src/a.txt"],
            EventKind::Access(AccessKind::Close(AccessMode::Write)),
        );

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].flags.closed_write);
    }

    #[test]
    fn test_from_notify_drops_unrecognized_kinds() {
        let roots = vec![PathBuf::from("/proj/src")];
        let read = make_event(
            vec!["/proj/src/a.txt"],
            EventKind::Access(AccessKind::Read),
        );
        let any = make_event(vec!["/proj/src/a.txt"], EventKind::Any);

        assert!(from_notify(&read, &roots).is_empty());
        assert!(from_notify(&any, &roots).is_empty());
    }

    #[test]
    fn test_from_notify_drops_paths_outside_roots() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(vec!["/elsewhere/a.txt"], modify_kind());

        assert!(from_notify(&event, &roots).is_empty());
    }

    #[test]
    fn test_from_notify_one_event_per_path() {
        let roots = vec![PathBuf::from("/proj/src")];
        let event = make_event(
            vec!["/proj/src/a.txt", "/proj/src/b.txt"],
            modify_kind(),
        );

        let changes = from_notify(&event, &roots);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_flags_recognized() {
        assert!(!EventFlags::default().is_recognized());
        let flags = EventFlags {
            modified: true,
            ..Default::default()
        };
        assert!(flags.is_recognized());
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::new(
            "a.txt",
            "/proj/src/a.txt",
            EventFlags {
                created: true,
                ..Default::default()
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("a.txt"));
        assert!(json.contains("created"));
    }
}
