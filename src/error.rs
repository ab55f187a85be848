use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinesweeperError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("a {width}x{height} board has more cells than can be addressed")]
    BoardTooLarge { width: usize, height: usize },
    #[error("{mines} mines do not fit on a board with {capacity} cells")]
    TooManyMines { mines: usize, capacity: usize },
    #[error("coordinate ({x}, {y}) is outside the minefield")]
    OutOfBounds { x: usize, y: usize },
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MinesweeperError>;
