use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use x3o3_engine::{Board, Game, GameStatus, Mark, Mode};

/// Which participant slots are taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlots {
    pub x: bool,
    pub o: bool,
}

/// Document status. `Waiting` exists only before the second participant
/// joins; the rest mirror the engine's game statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyStatus {
    Waiting,
    InProgress,
    Won,
    Draw,
    Abandoned,
}

impl LobbyStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, LobbyStatus::Won | LobbyStatus::Draw | LobbyStatus::Abandoned)
    }

    pub fn accepts_moves(self) -> bool {
        self == LobbyStatus::InProgress
    }
}

impl From<GameStatus> for LobbyStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::InProgress => LobbyStatus::InProgress,
            GameStatus::Won => LobbyStatus::Won,
            GameStatus::Draw => LobbyStatus::Draw,
            GameStatus::Abandoned => LobbyStatus::Abandoned,
        }
    }
}

/// Full external representation of one multiplayer game at a point in
/// time. Last-writer-wins at the store; participants never merge fields,
/// they replace local state from the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbySnapshot {
    pub board: Board,
    pub current_turn: Mark,
    pub mode: Mode,
    pub status: LobbyStatus,
    pub players: PlayerSlots,
    pub blocked_cell: Option<usize>,
    pub abandoned_by: Option<Mark>,
    /// Monotonic write counter; the store's optimistic-concurrency token.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl LobbySnapshot {
    /// Fresh lobby document: creator holds the X slot, opponent pending.
    pub fn new(mode: Mode) -> Self {
        Self {
            board: Board::new(),
            current_turn: Mark::X,
            mode,
            status: LobbyStatus::Waiting,
            players: PlayerSlots { x: true, o: false },
            blocked_cell: None,
            abandoned_by: None,
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Engine status for local reconciliation. A `Waiting` document maps
    /// to an in-progress game; move submission is gated separately until
    /// the opponent joins.
    pub fn game_status(&self) -> GameStatus {
        match self.status {
            LobbyStatus::Waiting | LobbyStatus::InProgress => GameStatus::InProgress,
            LobbyStatus::Won => GameStatus::Won,
            LobbyStatus::Draw => GameStatus::Draw,
            LobbyStatus::Abandoned => GameStatus::Abandoned,
        }
    }

    /// Rebuild a local game wholesale from this snapshot.
    pub fn to_game(&self) -> x3o3_engine::Result<Game> {
        Game::restore(
            self.mode,
            self.board.clone(),
            self.current_turn,
            self.game_status(),
            self.blocked_cell,
        )
    }

    /// Successor document after an accepted move, taking the authoritative
    /// fields back out of the engine.
    pub fn advanced_by(&self, game: &Game) -> Self {
        Self {
            board: game.board().clone(),
            current_turn: game.turn(),
            mode: self.mode,
            status: game.status().into(),
            players: self.players,
            blocked_cell: game.blocked_cell(),
            abandoned_by: None,
            version: self.version + 1,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_through_json() {
        let mut snapshot = LobbySnapshot::new(Mode::Expert);
        snapshot.players.o = true;
        snapshot.status = LobbyStatus::InProgress;
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: LobbySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn status_strings_match_document_format() {
        assert_eq!(
            serde_json::to_string(&LobbyStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&LobbyStatus::Waiting).unwrap(),
            "\"waiting\""
        );
    }

    #[test]
    fn to_game_is_a_pure_projection() {
        let snapshot = LobbySnapshot::new(Mode::Normal);
        let a = snapshot.to_game().unwrap();
        let b = snapshot.to_game().unwrap();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.turn(), b.turn());
        assert_eq!(a.status(), b.status());
    }
}
