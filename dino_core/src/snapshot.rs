use crate::world::{Snapshot, World};

/// Undo stack of full world copies.
///
/// The bottom entry is the state right after world setup and is never
/// popped, so once a history has been seeded its length stays at least one.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    /// Append an independent copy of `world`.
    pub fn push(&mut self, world: &World) {
        self.snapshots.push(world.snapshot());
    }

    /// Drop the newest snapshot and copy the one beneath it back into
    /// `world`. Returns `false` without touching anything when only the
    /// initial snapshot is left.
    pub fn undo(&mut self, world: &mut World) -> bool {
        if self.snapshots.len() <= 1 {
            return false;
        }
        self.snapshots.pop();
        match self.snapshots.last() {
            Some(top) => {
                world.restore(top);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn top(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Release every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.snapshots.shrink_to_fit();
    }
}
