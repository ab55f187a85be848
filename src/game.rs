use tracing::info;

use crate::engine::{Minefield, Position, RevealOutcome};
use crate::error::Result;

/// What a front end asks the session to do after mapping a key or click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveCursor { dx: isize, dy: isize },
    Flag(Position),
    Reveal(Position),
}

/// One game: a minefield plus the terminal loss/victory flags.
///
/// The minefield itself accepts moves at any time; this wrapper is what stops
/// reveals and flags once either flag is set.
pub struct Minesweeper {
    minefield: Minefield,
    game_over: bool,
    victory: bool,
}

impl Minesweeper {
    pub fn new(minefield: Minefield) -> Self {
        Self { minefield, game_over: false, victory: false }
    }

    pub fn minefield(&self) -> &Minefield { &self.minefield }
    pub fn minefield_mut(&mut self) -> &mut Minefield { &mut self.minefield }
    pub fn is_game_over(&self) -> bool { self.game_over }
    pub fn is_victory(&self) -> bool { self.victory }
    pub fn is_finished(&self) -> bool { self.game_over || self.victory }

    pub fn reveal_cell(&mut self, pos: Position) -> Result<RevealOutcome> {
        if self.is_finished() { return Ok(RevealOutcome::NoChange); }

        let outcome = self.minefield.reveal(pos)?;
        if outcome == RevealOutcome::HitMine {
            info!(x = pos.x, y = pos.y, "mine detonated");
            self.game_over = true;
        } else if self.minefield.all_non_mines_revealed() {
            info!("minefield cleared");
            self.victory = true;
        }
        Ok(outcome)
    }

    pub fn flag_cell(&mut self, pos: Position) -> Result<bool> {
        if self.is_finished() { return Ok(false); }
        self.minefield.flag(pos)
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        self.minefield.move_cursor(dx, dy);
    }

    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::MoveCursor { dx, dy } => self.move_cursor(dx, dy),
            Action::Flag(pos) => { self.flag_cell(pos)?; }
            Action::Reveal(pos) => { self.reveal_cell(pos)?; }
        }
        Ok(())
    }
}

impl std::fmt::Display for Minesweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.minefield)
    }
}
