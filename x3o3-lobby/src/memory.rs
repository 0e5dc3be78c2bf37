use crate::code::LobbyCode;
use crate::error::{LobbyError, Result};
use crate::snapshot::{LobbySnapshot, LobbyStatus};
use crate::store::{LobbyStore, Subscription};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{watch, Mutex};
use x3o3_engine::{EngineError, Mark, Mode};

/// In-memory reference implementation of the lobby store. One watch
/// channel per lobby carries the latest document to all subscribers;
/// every write happens under the store lock, which is what makes
/// `write_move` transactional.
#[derive(Default)]
pub struct MemoryLobbyStore {
    lobbies: Mutex<HashMap<LobbyCode, watch::Sender<LobbySnapshot>>>,
}

impl MemoryLobbyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LobbyStore for MemoryLobbyStore {
    async fn create_lobby(&self, mode: Mode) -> Result<LobbyCode> {
        let mut lobbies = self.lobbies.lock().await;
        let mut code = LobbyCode::generate();
        while lobbies.contains_key(&code) {
            code = LobbyCode::generate();
        }
        let (sender, _receiver) = watch::channel(LobbySnapshot::new(mode));
        lobbies.insert(code.clone(), sender);
        tracing::info!(%code, %mode, "created lobby");
        Ok(code)
    }

    async fn join_lobby(&self, code: &LobbyCode) -> Result<LobbySnapshot> {
        let lobbies = self.lobbies.lock().await;
        let sender = lobbies
            .get(code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        let mut snapshot = sender.borrow().clone();
        if snapshot.players.o || snapshot.status != LobbyStatus::Waiting {
            return Err(LobbyError::LobbyFull(code.clone()));
        }
        snapshot.players.o = true;
        snapshot.status = LobbyStatus::InProgress;
        snapshot.version += 1;
        sender.send_replace(snapshot.clone());
        tracing::info!(%code, "opponent joined, game started");
        Ok(snapshot)
    }

    async fn read(&self, code: &LobbyCode) -> Result<LobbySnapshot> {
        let lobbies = self.lobbies.lock().await;
        let sender = lobbies
            .get(code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        let snapshot = sender.borrow().clone();
        Ok(snapshot)
    }

    async fn subscribe(&self, code: &LobbyCode) -> Result<Subscription> {
        let lobbies = self.lobbies.lock().await;
        let sender = lobbies
            .get(code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        Ok(Subscription::new(sender.subscribe()))
    }

    async fn write_move(
        &self,
        code: &LobbyCode,
        cell: usize,
        role: Mark,
    ) -> Result<LobbySnapshot> {
        let lobbies = self.lobbies.lock().await;
        let sender = lobbies
            .get(code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        let current = sender.borrow().clone();

        match current.status {
            LobbyStatus::Waiting => return Err(LobbyError::GameNotStarted(code.clone())),
            status if status.is_terminal() => return Err(LobbyError::Engine(EngineError::GameOver)),
            _ => {}
        }
        // The submitter raced a newer write: its intent is stale, not illegal.
        if role != current.current_turn {
            tracing::debug!(%code, %role, turn = %current.current_turn, "rejected stale write");
            return Err(LobbyError::WriteConflict);
        }

        let mut game = current.to_game()?;
        game.apply_move(cell)?;
        let next = current.advanced_by(&game);
        sender.send_replace(next.clone());
        tracing::debug!(%code, %role, cell, version = next.version, "accepted move");
        Ok(next)
    }

    async fn signal_abandon(&self, code: &LobbyCode, role: Mark) -> Result<()> {
        let lobbies = self.lobbies.lock().await;
        let sender = lobbies
            .get(code)
            .ok_or_else(|| LobbyError::LobbyNotFound(code.clone()))?;
        let mut snapshot = sender.borrow().clone();
        if snapshot.status.is_terminal() {
            return Ok(());
        }
        snapshot.status = LobbyStatus::Abandoned;
        snapshot.abandoned_by = Some(role);
        snapshot.version += 1;
        sender.send_replace(snapshot);
        tracing::info!(%code, %role, "game abandoned");
        Ok(())
    }
}
