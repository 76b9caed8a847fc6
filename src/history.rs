use crate::surface::Snapshot;

/// Linear undo history over full-surface snapshots.
///
/// The cursor always points at the snapshot matching the visible surface.
/// Pushing while undone truncates everything past the cursor, so redo is
/// only available until the next commit. Snapshots share their pixel buffers,
/// so cloning entries in and out is cheap.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl SnapshotHistory {
    /// Start the history at an initial snapshot. The history is never empty
    /// afterwards.
    pub fn new(initial: Snapshot) -> Self {
        SnapshotHistory {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Commit a new snapshot after the cursor, discarding any redo entries.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor += 1;
    }

    /// Step back one snapshot. At the oldest entry this is a no-op.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward one snapshot. At the newest entry this is a no-op.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Drop every entry and restart from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
