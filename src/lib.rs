pub mod engine;
pub mod error;
pub mod game;
pub mod tui;

pub use engine::{Cell, CellState, Minefield, Position, RevealOutcome, Size};
pub use error::{MinesweeperError, Result};
pub use game::{Action, Minesweeper};
