use crate::board::{Mark, CELL_COUNT};
use crate::game::Game;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// How a cell should be rendered. Derived on demand from board and move
/// history; never part of stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPresentation {
    Empty,
    Visible,
    /// Expert mode: everything but a mark's most recent placement.
    Hidden,
    /// Beginner mode: a mark's oldest placement, about to rotate out.
    Fading,
    /// Luck mode: the permanently blocked cell.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub mark: Option<Mark>,
    pub presentation: CellPresentation,
}

/// Project the full board into per-cell render instructions.
pub fn render_cells(game: &Game) -> [CellView; CELL_COUNT] {
    let mut views = [CellView {
        mark: None,
        presentation: CellPresentation::Empty,
    }; CELL_COUNT];

    for (cell, view) in views.iter_mut().enumerate() {
        if game.blocked_cell() == Some(cell) {
            view.presentation = CellPresentation::Blocked;
            continue;
        }
        let Ok(Some(mark)) = game.board().get(cell) else {
            continue;
        };
        view.mark = Some(mark);
        view.presentation = match game.mode() {
            Mode::Expert if game.history().most_recent(mark) != Some(cell) => {
                CellPresentation::Hidden
            }
            Mode::Beginner if game.history().oldest(mark) == Some(cell) => {
                CellPresentation::Fading
            }
            _ => CellPresentation::Visible,
        };
    }
    views
}
