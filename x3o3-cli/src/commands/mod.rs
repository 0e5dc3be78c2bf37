mod demo;
mod play;

pub use demo::run_demo;
pub use play::play_local;

use x3o3_engine::Mode;

/// Print the available rule variants.
pub fn list_modes() -> anyhow::Result<()> {
    for mode in Mode::ALL {
        let note = match mode {
            Mode::Classic => "plain tic-tac-toe, marks never expire",
            Mode::Beginner => "rotating; each mark's oldest placement fades before it expires",
            Mode::Normal => "rotating; only your 3 most recent marks persist",
            Mode::Expert => "rotating; only your most recent mark is visible",
            Mode::Luck => "rotating; one random cell gets blocked mid-game",
        };
        println!("{:<10} {}", mode.as_str(), note);
    }
    Ok(())
}
