use crate::code::LobbyCode;
use thiserror::Error;
use x3o3_engine::Mark;

pub type Result<T> = std::result::Result<T, LobbyError>;

#[derive(Error, Debug)]
pub enum LobbyError {
    #[error("Rule engine error: {0}")]
    Engine(#[from] x3o3_engine::EngineError),

    #[error("Invalid lobby code: {0}")]
    InvalidCode(String),

    #[error("Lobby not found: {0}")]
    LobbyNotFound(LobbyCode),

    #[error("Lobby is full: {0}")]
    LobbyFull(LobbyCode),

    #[error("Lobby {0} is still waiting for an opponent")]
    GameNotStarted(LobbyCode),

    #[error("Not your turn: role {role} submitted while {current_turn} is to move")]
    NotYourTurn { role: Mark, current_turn: Mark },

    #[error("Write conflict: the move no longer matches the lobby's current state")]
    WriteConflict,

    #[error("Snapshot subscription is no longer active")]
    SubscriptionClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
