use std::sync::Arc;
use x3o3_engine::{Mark, Mode};
use x3o3_lobby::{Arbitrator, LobbyError, LobbyStore, MemoryLobbyStore};

/// Scripted two-participant game over the in-memory lobby store,
/// including one deliberately stale write to show conflict handling.
pub async fn run_demo(mode: Mode) -> anyhow::Result<()> {
    let store = Arc::new(MemoryLobbyStore::new());

    let mut host = Arbitrator::create(store.clone() as Arc<dyn LobbyStore>, mode).await?;
    let code = host.code().clone();
    println!("created lobby {} (mode: {})", code, mode);

    let mut guest = Arbitrator::join(store.clone() as Arc<dyn LobbyStore>, code).await?;
    host.refresh().await?;
    println!("opponent joined as {}", guest.role());

    // X@0 O@4 X@1 O@5 — one move short of the row win.
    for (cell, x_moves) in [(0, true), (4, false), (1, true), (5, false)] {
        if x_moves {
            host.submit_move(cell).await?;
            guest.sync().await?;
        } else {
            guest.submit_move(cell).await?;
            host.sync().await?;
        }
        println!("move accepted at cell {} (version {})", cell, host.snapshot().version);
    }

    // O races a write while it is X's turn; the store refuses it.
    match store.write_move(host.code(), 8, Mark::O).await {
        Err(LobbyError::WriteConflict) => {
            println!("stale write by O at cell 8 rejected: write conflict")
        }
        other => anyhow::bail!("expected a write conflict, got {:?}", other.map(|s| s.version)),
    }

    host.submit_move(2).await?;
    guest.sync().await?;
    println!(
        "game over: {} (winner: {:?})",
        serde_json::to_string(&host.snapshot().status)?,
        host.game().winner()
    );

    host.cancel_subscription();
    guest.cancel_subscription();
    Ok(())
}
