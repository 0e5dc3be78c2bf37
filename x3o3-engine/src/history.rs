use crate::board::{Board, Mark, CELL_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// In rotating modes only a mark's 3 most recent placements persist.
pub const ROTATION_DEPTH: usize = 3;

/// Per-mark placement queues, oldest first. Every index held here must
/// correspond to a board cell currently carrying that mark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    x: VecDeque<usize>,
    o: VecDeque<usize>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, mark: Mark) -> &VecDeque<usize> {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    fn queue_mut(&mut self, mark: Mark) -> &mut VecDeque<usize> {
        match mark {
            Mark::X => &mut self.x,
            Mark::O => &mut self.o,
        }
    }

    /// Record a placement. Unbounded; rotation eviction is a separate step
    /// so classic mode can keep the full history.
    pub fn push(&mut self, mark: Mark, cell: usize) {
        self.queue_mut(mark).push_back(cell);
    }

    /// Pop the oldest placement once the queue has grown past the
    /// rotation depth. Returns the evicted cell.
    pub fn evict_if_over_depth(&mut self, mark: Mark) -> Option<usize> {
        let queue = self.queue_mut(mark);
        if queue.len() > ROTATION_DEPTH {
            queue.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self, mark: Mark) -> usize {
        self.queue(mark).len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.o.is_empty()
    }

    pub fn total(&self) -> usize {
        self.x.len() + self.o.len()
    }

    pub fn contains(&self, mark: Mark, cell: usize) -> bool {
        self.queue(mark).contains(&cell)
    }

    pub fn oldest(&self, mark: Mark) -> Option<usize> {
        self.queue(mark).front().copied()
    }

    pub fn most_recent(&self, mark: Mark) -> Option<usize> {
        self.queue(mark).back().copied()
    }

    pub fn iter(&self, mark: Mark) -> impl Iterator<Item = usize> + '_ {
        self.queue(mark).iter().copied()
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.o.clear();
    }

    /// Rebuild both queues by scanning the board in index order. Placement
    /// order is not recoverable from a board snapshot, so reconciliation
    /// settles for index order on both sides, keeping participants
    /// consistent with each other.
    pub fn rebuild_from_board(board: &Board) -> Self {
        let mut history = Self::new();
        for cell in 0..CELL_COUNT {
            if let Ok(Some(mark)) = board.get(cell) {
                history.push(mark, cell);
            }
        }
        history
    }
}
