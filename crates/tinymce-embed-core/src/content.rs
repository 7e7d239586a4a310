//! Content writes between the host and the editor.
//!
//! Content is host-authoritative when an editor is (re)initialized and
//! editor-authoritative while the user is typing. Every host-driven write
//! issues a new [`ContentStamp`]; a write that was scheduled under an older
//! stamp is dropped when it finally runs.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::events::EditorEvent;
use crate::widget::EditorWidget;

/// Monotonic marker for the most recent host-driven content write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentStamp(u64);

impl ContentStamp {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What `on_update_content` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentWrite {
    Written,
    /// Empty content never overwrites what the user typed.
    SkippedEmpty,
    /// The editor already holds this content, e.g. the host echoing back a
    /// change event.
    SkippedUnchanged,
}

struct SyncState {
    current: Cell<ContentStamp>,
    alive: Cell<bool>,
}

/// Stamp-guarded content writes for one embedding.
///
/// Clones share state, so a clone captured by a deferred callback sees stamps
/// issued after it was made.
#[derive(Clone)]
pub struct ContentSynchronizer {
    state: Rc<SyncState>,
}

impl ContentSynchronizer {
    pub fn new() -> Self {
        Self {
            state: Rc::new(SyncState {
                current: Cell::new(ContentStamp::default()),
                alive: Cell::new(true),
            }),
        }
    }

    /// The stamp that pending writes are checked against.
    pub fn current_stamp(&self) -> ContentStamp {
        self.state.current.get()
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive.get()
    }

    /// Invalidate every pending write. Called when the embedding unmounts.
    pub fn shutdown(&self) {
        self.state.alive.set(false);
    }

    fn next_stamp(&self) -> ContentStamp {
        let next = ContentStamp(self.state.current.get().0 + 1);
        self.state.current.set(next);
        next
    }

    /// Schedule `content` to be written once `instance` reports it is ready.
    ///
    /// The editor ignores content set before its own setup finishes, and by
    /// the time it is ready a newer initialization or an explicit update may
    /// already have superseded this write. The write only happens if the
    /// returned stamp is still current and the synchronizer is alive.
    pub fn on_initialize<W: EditorWidget>(
        &self,
        instance: &W,
        content: impl Into<String>,
    ) -> ContentStamp {
        let stamp = self.next_stamp();
        let state: Weak<SyncState> = Rc::downgrade(&self.state);
        let target = instance.clone();
        let mut content = Some(content.into());

        instance.on(
            EditorEvent::Init,
            Box::new(move |_| {
                let Some(content) = content.take() else {
                    return;
                };
                let Some(state) = state.upgrade() else {
                    tracing::trace!(%stamp, "embedding dropped before editor init");
                    return;
                };
                if !state.alive.get() {
                    tracing::debug!(%stamp, "embedding unmounted before editor init, skipping content");
                    return;
                }
                let current = state.current.get();
                if current != stamp {
                    tracing::debug!(%stamp, %current, "initial content superseded, skipping");
                    return;
                }
                target.set_content(&content);
            }),
        );

        stamp
    }

    /// Push host content into a live editor.
    ///
    /// Skips the write when `content` is empty (a stale or malformed update
    /// must not erase user text) or when the editor already holds it (writing
    /// would reset the cursor mid-edit).
    pub fn on_update_content<W: EditorWidget>(&self, instance: &W, content: &str) -> ContentWrite {
        let stamp = self.next_stamp();
        if content.is_empty() {
            tracing::trace!(%stamp, "empty content update ignored");
            return ContentWrite::SkippedEmpty;
        }
        if instance.content() == content {
            tracing::trace!(%stamp, "content unchanged, not writing");
            return ContentWrite::SkippedUnchanged;
        }
        instance.set_content(content);
        tracing::debug!(%stamp, len = content.len(), "content written to editor");
        ContentWrite::Written
    }
}

impl Default for ContentSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSynchronizer")
            .field("current", &self.current_stamp())
            .field("alive", &self.is_alive())
            .finish()
    }
}
