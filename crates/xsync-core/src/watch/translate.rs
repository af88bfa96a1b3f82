//! Translation of `notify` events into raw events
//!
//! Renames arrive from the OS as separate legs. A `From` leg is held
//! back until the next event so it can be paired with its `To` leg into
//! a single move; the `Both` echo some backends send afterwards is
//! dropped.

use std::fs;
use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use crate::normalizer::RawEvent;

#[derive(Debug)]
struct PendingFrom {
    path: PathBuf,
    tracker: Option<usize>,
}

/// Stateful adapter from `notify` events to [`RawEvent`]s
#[derive(Debug, Default)]
pub struct EventTranslator {
    pending: Option<PendingFrom>,
    last_pair: Option<(PathBuf, PathBuf)>,
}

impl EventTranslator {
    /// Create a translator with nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one `notify` event. May also release a held rename leg.
    pub fn translate(&mut self, event: Event) -> Vec<RawEvent> {
        let tracker = event.tracker();
        match event.kind {
            EventKind::Modify(ModifyKind::Name(mode)) => self.rename(mode, event.paths, tracker),
            kind => {
                self.last_pair = None;
                let mut out = self.flush();
                out.extend(plain(kind, event.paths));
                out
            }
        }
    }

    /// Release a held `From` leg as a deletion.
    ///
    /// Called when the event stream goes quiet: a rename whose other leg
    /// never arrived moved the path out of the watched tree.
    pub fn flush(&mut self) -> Vec<RawEvent> {
        self.pending
            .take()
            .map(|from| RawEvent::deleted(from.path, false))
            .into_iter()
            .collect()
    }

    fn rename(&mut self, mode: RenameMode, paths: Vec<PathBuf>, tracker: Option<usize>) -> Vec<RawEvent> {
        let mut paths = paths.into_iter();
        match mode {
            RenameMode::From => {
                let out = self.flush();
                self.last_pair = None;
                if let Some(path) = paths.next() {
                    self.pending = Some(PendingFrom { path, tracker });
                }
                out
            }
            RenameMode::To => {
                let Some(dest) = paths.next() else {
                    return self.flush();
                };
                match self.pending.take() {
                    Some(from) if from.tracker == tracker => {
                        self.last_pair = Some((from.path.clone(), dest.clone()));
                        let is_dir = is_dir(&dest);
                        vec![RawEvent::moved(from.path, dest, is_dir)]
                    }
                    other => {
                        self.pending = other;
                        let mut out = self.flush();
                        let is_dir = is_dir(&dest);
                        out.push(RawEvent::created(dest, is_dir));
                        out
                    }
                }
            }
            RenameMode::Both => {
                let mut out = self.flush();
                if let (Some(src), Some(dest)) = (paths.next(), paths.next()) {
                    let pair = (src, dest);
                    if self.last_pair.as_ref() == Some(&pair) {
                        self.last_pair = None;
                    } else {
                        let is_dir = is_dir(&pair.1);
                        out.push(RawEvent::moved(pair.0, pair.1, is_dir));
                    }
                }
                out
            }
            RenameMode::Any | RenameMode::Other => {
                // Only one side of the rename is known: look at the disk
                let mut out = self.flush();
                self.last_pair = None;
                for path in paths {
                    match fs::symlink_metadata(&path) {
                        Ok(meta) => out.push(RawEvent::created(path, meta.is_dir())),
                        Err(_) => out.push(RawEvent::deleted(path, false)),
                    }
                }
                out
            }
        }
    }
}

fn plain(kind: EventKind, paths: Vec<PathBuf>) -> Vec<RawEvent> {
    match kind {
        EventKind::Create(create) => paths
            .into_iter()
            .map(|p| {
                let is_dir = create == CreateKind::Folder || is_dir(&p);
                RawEvent::created(p, is_dir)
            })
            .collect(),
        EventKind::Remove(remove) => paths
            .into_iter()
            .map(|p| RawEvent::deleted(p, remove == RemoveKind::Folder))
            .collect(),
        EventKind::Modify(_) => paths
            .into_iter()
            .map(|p| {
                let is_dir = is_dir(&p);
                RawEvent::modified(p, is_dir)
            })
            .collect(),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

/// Directory check that does not follow symlinks
fn is_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}
