use crate::code::LobbyCode;
use crate::error::{LobbyError, Result};
use crate::snapshot::LobbySnapshot;
use async_trait::async_trait;
use tokio::sync::watch;
use x3o3_engine::{Mark, Mode};

/// Contract for the external synchronized lobby/document store.
///
/// The store owns concurrency control: `write_move` is re-validated
/// against the document the store holds at write time, not against the
/// submitter's view, so at most one accepted write exists per legal move.
#[async_trait]
pub trait LobbyStore: Send + Sync {
    /// Create a `Waiting` lobby; the creator holds the X slot.
    async fn create_lobby(&self, mode: Mode) -> Result<LobbyCode>;

    /// Claim the O slot and flip the lobby to `in_progress`.
    async fn join_lobby(&self, code: &LobbyCode) -> Result<LobbySnapshot>;

    /// Latest document snapshot.
    async fn read(&self, code: &LobbyCode) -> Result<LobbySnapshot>;

    /// Snapshot notifications, in store delivery order. Intermediate
    /// snapshots may be coalesced; a receiver always observes the latest.
    async fn subscribe(&self, code: &LobbyCode) -> Result<Subscription>;

    /// Submit a move for `role`, transactionally validated and applied
    /// against the store's current document. Returns the new snapshot.
    async fn write_move(&self, code: &LobbyCode, cell: usize, role: Mark)
        -> Result<LobbySnapshot>;

    /// Terminal abandonment signal from a departing participant.
    async fn signal_abandon(&self, code: &LobbyCode, role: Mark) -> Result<()>;
}

/// Scoped handle on a lobby's snapshot feed. Cancellation is idempotent
/// and also runs on drop, so teardown happens on every exit path.
pub struct Subscription {
    receiver: Option<watch::Receiver<LobbySnapshot>>,
}

impl Subscription {
    pub(crate) fn new(receiver: watch::Receiver<LobbySnapshot>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Await the next snapshot. Fails once cancelled or once the store
    /// has dropped the lobby.
    pub async fn recv(&mut self) -> Result<LobbySnapshot> {
        let receiver = self
            .receiver
            .as_mut()
            .ok_or(LobbyError::SubscriptionClosed)?;
        receiver
            .changed()
            .await
            .map_err(|_| LobbyError::SubscriptionClosed)?;
        Ok(receiver.borrow_and_update().clone())
    }

    /// The snapshot most recently delivered, without waiting.
    pub fn latest(&mut self) -> Result<LobbySnapshot> {
        let receiver = self
            .receiver
            .as_mut()
            .ok_or(LobbyError::SubscriptionClosed)?;
        Ok(receiver.borrow_and_update().clone())
    }

    /// Tear down the subscription. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}
