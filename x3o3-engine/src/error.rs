use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cell index out of range: {cell}")]
    InvalidCell { cell: usize },

    #[error("Cell {cell} is already occupied")]
    CellOccupied { cell: usize },

    #[error("Cell {cell} is blocked for the rest of the game")]
    CellBlocked { cell: usize },

    #[error("Game is over, no further moves accepted")]
    GameOver,

    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

impl EngineError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
