use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the 3x3 grid, indexed 0-8 in row-major order.
pub const CELL_COUNT: usize = 9;

/// The 8 winning lines: rows, columns, diagonals. Scan order is fixed;
/// the first matching line wins.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark. Doubles as the participant role in multiplayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Fixed-size board, the sole source of truth for cell occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn get(&self, cell: usize) -> Result<Option<Mark>> {
        self.cells
            .get(cell)
            .copied()
            .ok_or(EngineError::InvalidCell { cell })
    }

    /// Place a mark on an empty cell.
    pub fn place(&mut self, cell: usize, mark: Mark) -> Result<()> {
        match self.get(cell)? {
            Some(_) => Err(EngineError::CellOccupied { cell }),
            None => {
                self.cells[cell] = Some(mark);
                Ok(())
            }
        }
    }

    /// Clear a cell (rotation eviction).
    pub fn clear(&mut self, cell: usize) -> Result<()> {
        if cell >= CELL_COUNT {
            return Err(EngineError::InvalidCell { cell });
        }
        self.cells[cell] = None;
        Ok(())
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// Indices of empty cells, excluding an optionally blocked one.
    pub fn empty_cells(&self, blocked: Option<usize>) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(i, v)| v.is_none() && Some(*i) != blocked)
            .map(|(i, _)| i)
            .collect()
    }

    /// True once every cell is either occupied or permanently blocked.
    pub fn is_exhausted(&self, blocked: Option<usize>) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(i, v)| v.is_some() || Some(i) == blocked)
    }

    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_some()).count()
    }

    /// Scan the fixed line table for three equal marks. First match wins.
    pub fn winner(&self) -> Option<(Mark, [usize; 3])> {
        for line in WIN_LINES {
            let [a, b, c] = line;
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Some((mark, line));
                }
            }
        }
        None
    }
}
