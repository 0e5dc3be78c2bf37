use dialoguer::Input;
use x3o3_engine::{
    render_cells, CellPresentation, CellView, Game, GameEvent, Mode, Notifier, Outcome, CELL_COUNT,
};

/// Plays audio cue tags through the log; the engine never waits on it.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: GameEvent) {
        tracing::info!(cue = %event.tag(), "audio cue");
    }
}

fn cell_glyph(index: usize, view: &CellView) -> String {
    match view.presentation {
        CellPresentation::Empty => index.to_string(),
        CellPresentation::Blocked => "#".to_string(),
        CellPresentation::Hidden => "·".to_string(),
        CellPresentation::Fading => view
            .mark
            .map(|m| m.to_string().to_lowercase())
            .unwrap_or_default(),
        CellPresentation::Visible => view.mark.map(|m| m.to_string()).unwrap_or_default(),
    }
}

fn render(game: &Game) {
    let views = render_cells(game);
    println!();
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                cell_glyph(index, &views[index])
            })
            .collect();
        println!("  {}", cells.join(" | "));
        if row < 2 {
            println!(" ---+---+---");
        }
    }
    println!();
}

fn announce(game: &Game, outcome: &Outcome) {
    match outcome {
        Outcome::Won { mark, line } => {
            println!("{} wins on line {:?}!", mark, line);
        }
        Outcome::Draw => println!("It's a draw!"),
        Outcome::Continue => {
            if let Some(blocked) = game.blocked_cell() {
                println!("Turn: {} | mode: {} | blocked cell: {}", game.turn(), game.mode(), blocked);
            } else {
                println!("Turn: {} | mode: {}", game.turn(), game.mode());
            }
        }
    }
}

/// Hot-seat local game: both marks are played at this terminal.
pub fn play_local(mode: Mode, seed: Option<u64>) -> anyhow::Result<()> {
    let notifier = LogNotifier;
    let mut game = match seed {
        Some(seed) => Game::with_seed(mode, seed),
        None => Game::new(mode),
    };

    println!("X³O³ — mode: {}", mode);
    render(&game);

    loop {
        let mark = game.turn();
        let cell: usize = Input::new()
            .with_prompt(format!("{} to move (cell 0-8)", mark))
            .validate_with(|input: &usize| {
                if *input >= CELL_COUNT {
                    Err("cell must be 0-8")
                } else if !game.is_legal(*input) {
                    Err("cell is occupied or blocked")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let outcome = match game.apply_move(cell) {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        for event in GameEvent::from_move(mark, &outcome) {
            notifier.notify(event);
        }

        render(&game);
        announce(&game, &outcome);
        if !matches!(outcome, Outcome::Continue) {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use x3o3_engine::Mark;

    #[test]
    fn glyphs_cover_every_presentation() {
        let visible = CellView {
            mark: Some(Mark::X),
            presentation: CellPresentation::Visible,
        };
        let fading = CellView {
            mark: Some(Mark::O),
            presentation: CellPresentation::Fading,
        };
        let hidden = CellView {
            mark: Some(Mark::X),
            presentation: CellPresentation::Hidden,
        };
        let blocked = CellView {
            mark: None,
            presentation: CellPresentation::Blocked,
        };
        assert_eq!(cell_glyph(0, &visible), "X");
        assert_eq!(cell_glyph(0, &fading), "o");
        assert_eq!(cell_glyph(0, &hidden), "·");
        assert_eq!(cell_glyph(0, &blocked), "#");
    }
}
