use crate::board::Mark;
use crate::game::Outcome;

/// Event tags a front end may turn into audio cues. Fire-and-forget; the
/// engine never consumes anything back from the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Move(Mark),
    Win(Mark),
    Draw,
}

impl GameEvent {
    pub fn tag(&self) -> String {
        match self {
            GameEvent::Move(mark) => format!("move:{}", mark),
            GameEvent::Win(_) => "win".to_string(),
            GameEvent::Draw => "draw".to_string(),
        }
    }

    /// Events raised by one accepted move: the placement itself, plus a
    /// terminal cue when the move ended the game.
    pub fn from_move(mark: Mark, outcome: &Outcome) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::Move(mark)];
        match outcome {
            Outcome::Won { mark, .. } => events.push(GameEvent::Win(*mark)),
            Outcome::Draw => events.push(GameEvent::Draw),
            Outcome::Continue => {}
        }
        events
    }
}

/// Audio collaborator contract: may play a cue for an event tag.
pub trait Notifier {
    fn notify(&self, event: GameEvent);
}
