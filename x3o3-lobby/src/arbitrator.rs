use crate::code::LobbyCode;
use crate::error::{LobbyError, Result};
use crate::snapshot::{LobbySnapshot, LobbyStatus};
use crate::store::{LobbyStore, Subscription};
use std::sync::Arc;
use x3o3_engine::{Game, GameStatus, Mark, Mode};

/// One participant's view of a shared game.
///
/// Local state is always a projection of the latest observed snapshot:
/// moves are submitted optimistically to the store and the local game is
/// replaced wholesale on every snapshot, never merged field-by-field.
pub struct Arbitrator {
    store: Arc<dyn LobbyStore>,
    code: LobbyCode,
    role: Mark,
    game: Game,
    latest: LobbySnapshot,
    subscription: Option<Subscription>,
}

impl Arbitrator {
    /// Create a lobby and take the X role.
    pub async fn create(store: Arc<dyn LobbyStore>, mode: Mode) -> Result<Self> {
        let code = store.create_lobby(mode).await?;
        Self::attach(store, code, Mark::X).await
    }

    /// Join an existing lobby and take the O role.
    pub async fn join(store: Arc<dyn LobbyStore>, code: LobbyCode) -> Result<Self> {
        store.join_lobby(&code).await?;
        Self::attach(store, code, Mark::O).await
    }

    async fn attach(store: Arc<dyn LobbyStore>, code: LobbyCode, role: Mark) -> Result<Self> {
        let mut subscription = store.subscribe(&code).await?;
        // A write can land between create/join and the subscribe; the
        // channel's current value is the authoritative starting point,
        // not the snapshot those calls returned.
        let snapshot = subscription.latest()?;
        let game = snapshot.to_game()?;
        tracing::info!(%code, %role, "attached to lobby");
        Ok(Self {
            store,
            code,
            role,
            game,
            latest: snapshot,
            subscription: Some(subscription),
        })
    }

    pub fn code(&self) -> &LobbyCode {
        &self.code
    }

    pub fn role(&self) -> Mark {
        self.role
    }

    /// The reconciled local game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The snapshot local state was last derived from.
    pub fn snapshot(&self) -> &LobbySnapshot {
        &self.latest
    }

    pub fn is_my_turn(&self) -> bool {
        self.latest.status.accepts_moves() && self.game.turn() == self.role
    }

    /// Submit a move for this participant's role.
    ///
    /// Prechecked against the latest known snapshot (`NotYourTurn`, and
    /// full engine legality on a scratch copy), then written to the
    /// store, which re-validates against its own current document. A
    /// failure is surfaced as-is; the stale intent is never retried.
    pub async fn submit_move(&mut self, cell: usize) -> Result<()> {
        if self.latest.status == LobbyStatus::Waiting {
            return Err(LobbyError::GameNotStarted(self.code.clone()));
        }
        if self.latest.status.is_terminal() {
            return Err(LobbyError::Engine(x3o3_engine::EngineError::GameOver));
        }
        if self.role != self.game.turn() {
            return Err(LobbyError::NotYourTurn {
                role: self.role,
                current_turn: self.game.turn(),
            });
        }
        // Validate on a scratch copy; local state only changes through
        // snapshot reconciliation.
        self.game.clone().apply_move(cell)?;

        let snapshot = self.store.write_move(&self.code, cell, self.role).await?;
        self.apply_snapshot(snapshot)
    }

    /// Full-replace reconciliation from a received snapshot. Idempotent:
    /// applying the same snapshot again yields identical local state.
    pub fn apply_snapshot(&mut self, snapshot: LobbySnapshot) -> Result<()> {
        self.game = snapshot.to_game()?;
        tracing::debug!(
            code = %self.code,
            version = snapshot.version,
            status = ?snapshot.status,
            "reconciled local state from snapshot"
        );
        self.latest = snapshot;
        Ok(())
    }

    /// Await the next snapshot notification and reconcile with it.
    pub async fn sync(&mut self) -> Result<&LobbySnapshot> {
        let subscription = self
            .subscription
            .as_mut()
            .ok_or(LobbyError::SubscriptionClosed)?;
        let snapshot = subscription.recv().await?;
        self.apply_snapshot(snapshot)?;
        Ok(&self.latest)
    }

    /// Reconcile with whatever the store holds right now, without waiting.
    pub async fn refresh(&mut self) -> Result<&LobbySnapshot> {
        let snapshot = self.store.read(&self.code).await?;
        self.apply_snapshot(snapshot)?;
        Ok(&self.latest)
    }

    /// Leave the game: signal abandonment and tear down the subscription.
    pub async fn leave(&mut self) -> Result<()> {
        if !self.latest.status.is_terminal() {
            self.store.signal_abandon(&self.code, self.role).await?;
        }
        if self.game.status() == GameStatus::InProgress {
            self.game.abandon()?;
        }
        self.cancel_subscription();
        tracing::info!(code = %self.code, role = %self.role, "left lobby");
        Ok(())
    }

    /// Idempotent subscription teardown.
    pub fn cancel_subscription(&mut self) {
        if let Some(subscription) = self.subscription.as_mut() {
            subscription.cancel();
        }
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLobbyStore;
    use async_trait::async_trait;
    use x3o3_engine::{EngineError, Outcome};

    /// Store double where the host's opening move lands inside
    /// `join_lobby`, before the joiner has a chance to subscribe.
    struct EagerHostStore {
        inner: MemoryLobbyStore,
    }

    #[async_trait]
    impl LobbyStore for EagerHostStore {
        async fn create_lobby(&self, mode: Mode) -> crate::error::Result<LobbyCode> {
            self.inner.create_lobby(mode).await
        }

        async fn join_lobby(&self, code: &LobbyCode) -> crate::error::Result<LobbySnapshot> {
            let snapshot = self.inner.join_lobby(code).await?;
            self.inner.write_move(code, 0, Mark::X).await?;
            Ok(snapshot)
        }

        async fn read(&self, code: &LobbyCode) -> crate::error::Result<LobbySnapshot> {
            self.inner.read(code).await
        }

        async fn subscribe(&self, code: &LobbyCode) -> crate::error::Result<Subscription> {
            self.inner.subscribe(code).await
        }

        async fn write_move(
            &self,
            code: &LobbyCode,
            cell: usize,
            role: Mark,
        ) -> crate::error::Result<LobbySnapshot> {
            self.inner.write_move(code, cell, role).await
        }

        async fn signal_abandon(&self, code: &LobbyCode, role: Mark) -> crate::error::Result<()> {
            self.inner.signal_abandon(code, role).await
        }
    }

    async fn paired(mode: Mode) -> (Arc<MemoryLobbyStore>, Arbitrator, Arbitrator) {
        let store = Arc::new(MemoryLobbyStore::new());
        let mut host = Arbitrator::create(store.clone() as Arc<dyn LobbyStore>, mode)
            .await
            .unwrap();
        let code = host.code().clone();
        let guest = Arbitrator::join(store.clone() as Arc<dyn LobbyStore>, code)
            .await
            .unwrap();
        host.refresh().await.unwrap();
        (store, host, guest)
    }

    #[tokio::test]
    async fn roles_and_start_state() {
        let (_store, host, guest) = paired(Mode::Normal).await;
        assert_eq!(host.role(), Mark::X);
        assert_eq!(guest.role(), Mark::O);
        assert!(host.is_my_turn());
        assert!(!guest.is_my_turn());
        assert_eq!(host.snapshot().status, LobbyStatus::InProgress);
    }

    #[tokio::test]
    async fn moves_blocked_until_opponent_joins() {
        let store = Arc::new(MemoryLobbyStore::new());
        let mut host = Arbitrator::create(store as Arc<dyn LobbyStore>, Mode::Classic)
            .await
            .unwrap();
        assert!(matches!(
            host.submit_move(0).await,
            Err(LobbyError::GameNotStarted(_))
        ));
    }

    #[tokio::test]
    async fn full_game_converges_on_both_sides() {
        let (_store, mut host, mut guest) = paired(Mode::Classic).await;
        // X@0 O@4 X@1 O@5 X@2 — the classic row win.
        host.submit_move(0).await.unwrap();
        guest.sync().await.unwrap();
        guest.submit_move(4).await.unwrap();
        host.sync().await.unwrap();
        host.submit_move(1).await.unwrap();
        guest.sync().await.unwrap();
        guest.submit_move(5).await.unwrap();
        host.sync().await.unwrap();
        host.submit_move(2).await.unwrap();
        guest.sync().await.unwrap();

        for side in [&host, &guest] {
            assert_eq!(side.snapshot().status, LobbyStatus::Won);
            assert_eq!(side.game().winner(), Some(Mark::X));
            assert_eq!(side.game().winning_line(), Some([0, 1, 2]));
        }
    }

    #[tokio::test]
    async fn join_observes_moves_made_before_subscribing() {
        let store = Arc::new(EagerHostStore {
            inner: MemoryLobbyStore::new(),
        });
        let code = store.create_lobby(Mode::Classic).await.unwrap();
        let mut guest = Arbitrator::join(store as Arc<dyn LobbyStore>, code)
            .await
            .unwrap();

        // The opening move predates the guest's subscription; the initial
        // reconciled state must include it anyway, and waiting on a
        // notification for it would hang forever.
        assert_eq!(guest.game().board().get(0).unwrap(), Some(Mark::X));
        assert!(guest.is_my_turn());
        guest.submit_move(4).await.unwrap();
        assert_eq!(guest.game().turn(), Mark::X);
    }

    #[tokio::test]
    async fn out_of_turn_submission_fails_locally() {
        let (_store, _host, mut guest) = paired(Mode::Normal).await;
        let err = guest.submit_move(0).await;
        assert!(matches!(err, Err(LobbyError::NotYourTurn { .. })));
        assert_eq!(guest.game().board().mark_count(), 0);
    }

    #[tokio::test]
    async fn occupied_cell_rejected_before_hitting_the_store() {
        let (_store, mut host, mut guest) = paired(Mode::Classic).await;
        host.submit_move(4).await.unwrap();
        guest.sync().await.unwrap();
        assert!(matches!(
            guest.submit_move(4).await,
            Err(LobbyError::Engine(EngineError::CellOccupied { cell: 4 }))
        ));
    }

    #[tokio::test]
    async fn stale_submission_surfaces_write_conflict() {
        let (store, mut host, mut guest) = paired(Mode::Classic).await;
        host.submit_move(0).await.unwrap();
        guest.sync().await.unwrap();

        // The store advances past the guest's view before its write lands.
        store.write_move(host.code(), 4, Mark::O).await.unwrap();
        let err = guest.submit_move(5).await;
        assert!(matches!(err, Err(LobbyError::WriteConflict)));

        // The conflicting intent corrupted nothing; the next snapshot
        // carries the accepted state.
        guest.sync().await.unwrap();
        assert_eq!(guest.game().board().get(4).unwrap(), Some(Mark::O));
        assert_eq!(guest.game().board().get(5).unwrap(), None);
    }

    #[tokio::test]
    async fn luck_block_converges_and_is_rejected_locally() {
        let (_store, mut host, mut guest) = paired(Mode::Luck).await;
        for (cell, by_host) in [
            (0, true),
            (1, false),
            (5, true),
            (2, false),
            (7, true),
            (3, false),
        ] {
            if by_host {
                host.submit_move(cell).await.unwrap();
                guest.sync().await.unwrap();
            } else {
                guest.submit_move(cell).await.unwrap();
                host.sync().await.unwrap();
            }
        }

        let blocked = host.snapshot().blocked_cell.unwrap();
        assert!([4, 6, 8].contains(&blocked));
        assert_eq!(guest.snapshot().blocked_cell, Some(blocked));
        assert_eq!(host.game().blocked_cell(), Some(blocked));
        assert_eq!(guest.game().blocked_cell(), Some(blocked));

        // X is to move; the reconciled local game refuses the blocked
        // cell before the write ever reaches the store.
        assert!(matches!(
            host.submit_move(blocked).await,
            Err(LobbyError::Engine(EngineError::CellBlocked { .. }))
        ));
    }

    #[tokio::test]
    async fn reconciliation_is_idempotent() {
        let (_store, mut host, mut guest) = paired(Mode::Normal).await;
        host.submit_move(6).await.unwrap();
        let snapshot = guest.sync().await.unwrap().clone();

        guest.apply_snapshot(snapshot.clone()).unwrap();
        let first = guest.game().clone();
        guest.apply_snapshot(snapshot).unwrap();
        let second = guest.game().clone();

        assert_eq!(first.board(), second.board());
        assert_eq!(first.history(), second.history());
        assert_eq!(first.turn(), second.turn());
        assert_eq!(first.status(), second.status());
        assert_eq!(first.blocked_cell(), second.blocked_cell());
    }

    #[tokio::test]
    async fn leaving_abandons_for_the_other_side() {
        let (_store, mut host, mut guest) = paired(Mode::Expert).await;
        host.submit_move(0).await.unwrap();
        guest.sync().await.unwrap();

        guest.leave().await.unwrap();
        host.sync().await.unwrap();
        assert_eq!(host.snapshot().status, LobbyStatus::Abandoned);
        assert_eq!(host.snapshot().abandoned_by, Some(Mark::O));
        assert!(matches!(
            host.submit_move(1).await,
            Err(LobbyError::Engine(EngineError::GameOver))
        ));
    }

    #[tokio::test]
    async fn subscription_teardown_is_idempotent() {
        let (_store, mut host, _guest) = paired(Mode::Normal).await;
        host.cancel_subscription();
        host.cancel_subscription();
        assert!(matches!(
            host.sync().await,
            Err(LobbyError::SubscriptionClosed)
        ));
    }

    #[tokio::test]
    async fn local_engine_outcome_matches_store_document() {
        let (_store, mut host, mut guest) = paired(Mode::Classic).await;
        for (cell, by_host) in [(0, true), (4, false), (1, true), (5, false)] {
            if by_host {
                host.submit_move(cell).await.unwrap();
                guest.sync().await.unwrap();
            } else {
                guest.submit_move(cell).await.unwrap();
                host.sync().await.unwrap();
            }
        }
        // Replaying the final move locally produces the same outcome the
        // store recorded.
        let mut replay = host.game().clone();
        assert_eq!(
            replay.apply_move(2).unwrap(),
            Outcome::Won {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
        host.submit_move(2).await.unwrap();
        assert_eq!(host.snapshot().status, LobbyStatus::Won);
    }
}
