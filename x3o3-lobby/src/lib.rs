//! Multiplayer turn arbitration for X³O³.
//!
//! Two participants (roles X and O) share one logical game through an
//! external synchronized lobby document. There is no central arbiter:
//! each side writes moves optimistically and derives its local state
//! entirely from the latest snapshot it has observed. The store contract
//! ([`LobbyStore`]) carries the concurrency control; [`MemoryLobbyStore`]
//! is the in-process reference implementation.

pub mod arbitrator;
pub mod code;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod store;

pub use arbitrator::Arbitrator;
pub use code::{LobbyCode, CODE_LEN};
pub use error::{LobbyError, Result};
pub use memory::MemoryLobbyStore;
pub use snapshot::{LobbySnapshot, LobbyStatus, PlayerSlots};
pub use store::{LobbyStore, Subscription};

use std::sync::Arc;
use x3o3_engine::Mode;

/// Create a lobby on `store` and attach as the X participant.
pub async fn create_game(store: Arc<dyn LobbyStore>, mode: Mode) -> Result<Arbitrator> {
    Arbitrator::create(store, mode).await
}

/// Join the lobby at `code` as the O participant.
pub async fn join_game(store: Arc<dyn LobbyStore>, code: LobbyCode) -> Result<Arbitrator> {
    Arbitrator::join(store, code).await
}
