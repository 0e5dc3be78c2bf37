use crate::board::{Board, Mark, CELL_COUNT};
use crate::error::{EngineError, Result};
use crate::history::MoveHistory;
use crate::mode::Mode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Total marks on the board that trigger the one-time luck-mode block.
const LUCK_BLOCK_THRESHOLD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Draw,
    Abandoned,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Game goes on; the turn has flipped to the other mark.
    Continue,
    Won { mark: Mark, line: [usize; 3] },
    Draw,
}

/// One local game: the explicit state object every rule flows through.
/// Mutated only by [`Game::apply_move`] and [`Game::abandon`], or replaced
/// wholesale via [`Game::restore`] during multiplayer reconciliation.
#[derive(Debug, Clone)]
pub struct Game {
    mode: Mode,
    board: Board,
    history: MoveHistory,
    turn: Mark,
    status: GameStatus,
    blocked_cell: Option<usize>,
    winning_line: Option<[usize; 3]>,
    winner: Option<Mark>,
    rng: StdRng,
}

impl Game {
    /// Fresh game: empty board, X to move.
    pub fn new(mode: Mode) -> Self {
        Self::with_rng(mode, StdRng::from_entropy())
    }

    /// Deterministic RNG, for tests and replays.
    pub fn with_seed(mode: Mode, seed: u64) -> Self {
        Self::with_rng(mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: Mode, rng: StdRng) -> Self {
        Self {
            mode,
            board: Board::new(),
            history: MoveHistory::new(),
            turn: Mark::X,
            status: GameStatus::InProgress,
            blocked_cell: None,
            winning_line: None,
            winner: None,
            rng,
        }
    }

    /// Rebuild a game from shared-document fields. Placement order is not
    /// recorded in the document, so histories are re-derived from the
    /// board in index order.
    pub fn restore(
        mode: Mode,
        board: Board,
        turn: Mark,
        status: GameStatus,
        blocked_cell: Option<usize>,
    ) -> Result<Self> {
        if let Some(cell) = blocked_cell {
            if cell >= CELL_COUNT {
                return Err(EngineError::InvalidCell { cell });
            }
            if board.get(cell)?.is_some() {
                return Err(EngineError::invalid_state(format!(
                    "Blocked cell {} is occupied",
                    cell
                )));
            }
        }
        let history = MoveHistory::rebuild_from_board(&board);
        let (winner, winning_line) = match board.winner() {
            Some((mark, line)) => (Some(mark), Some(line)),
            None => (None, None),
        };
        Ok(Self {
            mode,
            board,
            history,
            turn,
            status,
            blocked_cell,
            winning_line,
            winner,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn blocked_cell(&self) -> Option<usize> {
        self.blocked_cell
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.winning_line
    }

    /// Whether a move at `cell` would pass the preconditions right now.
    pub fn is_legal(&self, cell: usize) -> bool {
        cell < CELL_COUNT
            && self.status == GameStatus::InProgress
            && self.blocked_cell != Some(cell)
            && matches!(self.board.get(cell), Ok(None))
    }

    /// Apply the current turn's move at `cell`.
    ///
    /// Order of effects: precondition checks, placement, rotation
    /// eviction, luck-mode blocking, win scan, draw check, turn flip.
    /// On any error the state is unchanged.
    pub fn apply_move(&mut self, cell: usize) -> Result<Outcome> {
        if cell >= CELL_COUNT {
            return Err(EngineError::InvalidCell { cell });
        }
        if self.status.is_terminal() {
            return Err(EngineError::GameOver);
        }
        if self.blocked_cell == Some(cell) {
            return Err(EngineError::CellBlocked { cell });
        }

        let mark = self.turn;
        self.board.place(cell, mark)?;
        self.history.push(mark, cell);
        tracing::debug!(%mark, cell, mode = %self.mode, "placed mark");

        if self.mode.rotates() {
            if let Some(oldest) = self.history.evict_if_over_depth(mark) {
                self.board.clear(oldest)?;
                tracing::debug!(%mark, evicted = oldest, "rotated out oldest mark");
            }
            self.maybe_block_cell();
        }

        if let Some((winner, line)) = self.board.winner() {
            self.status = GameStatus::Won;
            self.winner = Some(winner);
            self.winning_line = Some(line);
            tracing::info!(%winner, ?line, "game won");
            return Ok(Outcome::Won { mark: winner, line });
        }

        if self.board.is_exhausted(self.blocked_cell) {
            self.status = GameStatus::Draw;
            tracing::info!("game drawn");
            return Ok(Outcome::Draw);
        }

        self.turn = self.turn.opponent();
        Ok(Outcome::Continue)
    }

    /// Luck mode: the first time six marks sit on the board, one empty
    /// cell is blocked for the rest of the game. The opportunity is
    /// missed if no empty cell exists at that instant; it never retries.
    fn maybe_block_cell(&mut self) {
        if self.mode != Mode::Luck
            || self.blocked_cell.is_some()
            || self.history.total() != LUCK_BLOCK_THRESHOLD
        {
            return;
        }
        let open = self.board.empty_cells(None);
        if open.is_empty() {
            return;
        }
        let cell = open[self.rng.gen_range(0..open.len())];
        self.blocked_cell = Some(cell);
        tracing::info!(cell, "blocked cell for the rest of the game");
    }

    /// External abandonment signal. Terminal; idempotent once abandoned.
    pub fn abandon(&mut self) -> Result<()> {
        match self.status {
            GameStatus::InProgress => {
                self.status = GameStatus::Abandoned;
                tracing::info!("game abandoned");
                Ok(())
            }
            GameStatus::Abandoned => Ok(()),
            _ => Err(EngineError::GameOver),
        }
    }
}
