//! X³O³ rule engine - rotating tic-tac-toe with five rule variants
//!
//! Pure, deterministic state machine for one local game: board occupancy,
//! move legality, per-mode rotation and blocking rules, and terminal
//! detection. No I/O; multiplayer arbitration lives in `x3o3-lobby`.

pub mod board;
pub mod error;
pub mod events;
pub mod game;
pub mod history;
pub mod mode;
pub mod view;

pub use board::{Board, Mark, CELL_COUNT, WIN_LINES};
pub use error::{EngineError, Result};
pub use events::{GameEvent, Notifier};
pub use game::{Game, GameStatus, Outcome};
pub use history::{MoveHistory, ROTATION_DEPTH};
pub use mode::Mode;
pub use view::{render_cells, CellPresentation, CellView};
