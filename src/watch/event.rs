// src/watch/event.rs

//! Backend-neutral notification records and subscription bookkeeping.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};

/// Filesystem change kinds the watcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Created,
    Deleted,
    Modified,
    ClosedAfterWrite,
}

/// Kinds a directory subscription listens for.
pub const DIR_EVENTS: &[WatchEventKind] = &[WatchEventKind::Created, WatchEventKind::Deleted];

/// Kinds a file subscription listens for.
pub const FILE_EVENTS: &[WatchEventKind] =
    &[WatchEventKind::Modified, WatchEventKind::ClosedAfterWrite];

/// Opaque handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// One notification, attributed to the subscription that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub subscription: SubscriptionId,
    pub kind: WatchEventKind,
    /// Entry name inside the directory, for directory-level records.
    pub name: Option<OsString>,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub path: PathBuf,
    pub kinds: Vec<WatchEventKind>,
}

/// Subscriptions held by a backend, and the path → record attribution both
/// backends share.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    entries: HashMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &Path, kinds: &[WatchEventKind]) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.insert(
            id,
            Subscription {
                path: path.to_path_buf(),
                kinds: kinds.to_vec(),
            },
        );
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> Option<Subscription> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: SubscriptionId) -> Option<&Subscription> {
        self.entries.get(&id)
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.entries.values().any(|s| s.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute a change of `kind` at `path`.
    ///
    /// A subscription on `path` itself wins; otherwise a subscription on its
    /// parent directory gets a record naming the entry. Kinds the matching
    /// subscription did not ask for are dropped.
    pub fn resolve(&self, path: &Path, kind: WatchEventKind) -> Option<EventRecord> {
        let wants = |s: &Subscription| s.kinds.contains(&kind);

        if let Some((&id, _)) = self
            .entries
            .iter()
            .find(|(_, s)| s.path == path && wants(s))
        {
            return Some(EventRecord {
                subscription: id,
                kind,
                name: None,
            });
        }

        let parent = path.parent()?;
        let name = path.file_name()?;
        self.entries
            .iter()
            .find(|(_, s)| s.path == parent && wants(s))
            .map(|(&id, _)| EventRecord {
                subscription: id,
                kind,
                name: Some(name.to_os_string()),
            })
    }
}

/// Map a `notify` event kind onto the kinds we care about.
///
/// Renames are folded into create/delete so a `mv`-style rotation looks the
/// same as delete + recreate. `RenameMode::Both` is handled by the caller
/// since it carries two paths.
pub fn classify(kind: &notify::EventKind, path: &Path) -> Option<WatchEventKind> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) => Some(WatchEventKind::Created),
        EventKind::Remove(_) => Some(WatchEventKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(WatchEventKind::Created),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(WatchEventKind::Deleted),
        EventKind::Modify(ModifyKind::Name(_)) => {
            if path.exists() {
                Some(WatchEventKind::Created)
            } else {
                Some(WatchEventKind::Deleted)
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(WatchEventKind::Modified),
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            Some(WatchEventKind::ClosedAfterWrite)
        }
        _ => None,
    }
}
