//! Linear undo/redo history over scene snapshots.
//!
//! The history is a list of snapshots plus a cursor. Immediately after any
//! `commit`, `undo` or `redo`, the snapshot at the cursor equals the live
//! scene; mutating tool gestures commit exactly once, at pointer-up.

use crate::scene::SceneSnapshot;

/// Maximum number of snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// Linear snapshot history with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<SceneSnapshot>,
    cursor: usize,
}

impl History {
    /// Create a history seeded with the initial scene state.
    pub fn new(initial: SceneSnapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Commit a new snapshot.
    ///
    /// Truncates any redo tail beyond the cursor, appends, and evicts the
    /// oldest entry once the cap is exceeded (shifting the cursor down so
    /// it stays on the just-committed snapshot).
    pub fn commit(&mut self, snapshot: SceneSnapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None`
    /// at the start of history (silent no-op).
    pub fn undo(&mut self) -> Option<&SceneSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Returns the snapshot to restore, or
    /// `None` at the end of history (silent no-op).
    pub fn redo(&mut self) -> Option<&SceneSnapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// A history always holds at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Current cursor index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &SceneSnapshot {
        &self.snapshots[self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::scene::Scene;
    use kurbo::Point;

    fn snapshot_with(n: usize) -> SceneSnapshot {
        let mut scene = Scene::new();
        for i in 0..n {
            scene.push(Element::rect(
                Point::new(i as f64, 0.0),
                Point::new(i as f64 + 10.0, 10.0),
            ));
        }
        scene.snapshot()
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = History::new(snapshot_with(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_redo_at_end_is_noop() {
        let mut history = History::new(snapshot_with(0));
        history.commit(snapshot_with(1));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new(snapshot_with(0));
        history.commit(snapshot_with(1));
        history.commit(snapshot_with(2));

        let undone = history.undo().unwrap().clone();
        assert_eq!(undone.len(), 1);
        let redone = history.redo().unwrap().clone();
        assert_eq!(redone.len(), 2);
    }

    #[test]
    fn test_commit_truncates_redo_tail() {
        let mut history = History::new(snapshot_with(0));
        history.commit(snapshot_with(1));
        history.commit(snapshot_with(2));
        history.undo();
        assert!(history.can_redo());

        history.commit(snapshot_with(3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new(snapshot_with(0));
        for i in 1..=60 {
            history.commit(snapshot_with(i));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        // The most recent snapshots survive in order.
        assert_eq!(history.current().len(), 60);
        assert_eq!(history.cursor(), MAX_HISTORY - 1);

        // Walking all the way back lands on the oldest surviving snapshot.
        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY - 1);
        assert_eq!(history.current().len(), 60 - (MAX_HISTORY - 1));
    }
}
