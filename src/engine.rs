use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{MinesweeperError, Result};

/// Grid coordinate, 0-based, `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self { Self { x, y } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self { Self { width, height } }
    pub const fn area(self) -> Option<usize> { self.width.checked_mul(self.height) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Clone, Debug)]
pub struct Cell {
    is_mine: bool,
    adjacent_mines: u8,
    state: CellState,
    auto_reveal_triggered: bool,
}

impl Cell {
    fn new(is_mine: bool) -> Self {
        Self { is_mine, adjacent_mines: 0, state: CellState::Hidden, auto_reveal_triggered: false }
    }

    pub fn is_mine(&self) -> bool { self.is_mine }
    pub fn adjacent_mines(&self) -> u8 { self.adjacent_mines }
    pub fn state(&self) -> CellState { self.state }
    pub fn is_flagged(&self) -> bool { self.state == CellState::Flagged }
    pub fn is_revealed(&self) -> bool { self.state == CellState::Revealed }
    pub fn auto_reveal_triggered(&self) -> bool { self.auto_reveal_triggered }

    /// Hidden <-> Flagged. Revealed cells keep their state.
    fn toggle_flag(&mut self) -> bool {
        self.state = match self.state {
            CellState::Hidden => CellState::Flagged,
            CellState::Flagged => CellState::Hidden,
            CellState::Revealed => return false,
        };
        true
    }

    pub fn glyph(&self) -> char {
        match self.state {
            CellState::Hidden => '#',
            CellState::Flagged => 'F',
            CellState::Revealed if self.is_mine => '*',
            CellState::Revealed if self.adjacent_mines == 0 => '.',
            CellState::Revealed => char::from_digit(u32::from(self.adjacent_mines), 10).unwrap_or('?'),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The grid of cells plus the player's cursor.
///
/// Cells live in a flat row-major `Vec` and refer to each other only through
/// [`Position`]s, so every neighbour walk goes through the minefield.
pub struct Minefield {
    top_left: Position,
    size: Size,
    mines: usize,
    cells: Vec<Cell>,
    cursor: Position,
}

impl Minefield {
    /// Builds a minefield with `mines` distinct, uniformly sampled mine positions.
    pub fn new<R: Rng + ?Sized>(top_left: Position, size: Size, mines: usize, rng: &mut R) -> Result<Self> {
        let capacity = validate(size, mines)?;

        let mut positions = HashSet::with_capacity(mines);
        while positions.len() < mines {
            let candidate = Position::new(rng.random_range(0..size.width), rng.random_range(0..size.height));
            positions.insert(candidate);
        }
        let field = Self::build(top_left, size, capacity, &positions);
        debug!(width = size.width, height = size.height, mines, "generated minefield");
        Ok(field)
    }

    /// Builds a minefield with a fixed mine layout. Repeated positions count once.
    pub fn with_mines(top_left: Position, size: Size, mines: &[Position]) -> Result<Self> {
        for &pos in mines {
            check_bounds(size, pos)?;
        }
        let positions: HashSet<Position> = mines.iter().copied().collect();
        let capacity = validate(size, positions.len())?;
        Ok(Self::build(top_left, size, capacity, &positions))
    }

    fn build(top_left: Position, size: Size, capacity: usize, mines: &HashSet<Position>) -> Self {
        let mut cells = Vec::with_capacity(capacity);
        for y in 0..size.height {
            for x in 0..size.width {
                cells.push(Cell::new(mines.contains(&Position::new(x, y))));
            }
        }
        let mut field = Self { top_left, size, mines: mines.len(), cells, cursor: Position::default() };
        field.compute_adjacency();
        field
    }

    fn compute_adjacency(&mut self) {
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let pos = Position::new(x, y);
                let count = self.neighbors(pos).filter(|&n| self.cells[self.index(n)].is_mine).count();
                let i = self.index(pos);
                self.cells[i].adjacent_mines = u8::try_from(count).unwrap_or(u8::MAX);
            }
        }
    }

    pub fn top_left(&self) -> Position { self.top_left }
    pub fn size(&self) -> Size { self.size }
    pub fn width(&self) -> usize { self.size.width }
    pub fn height(&self) -> usize { self.size.height }
    pub fn mine_count(&self) -> usize { self.mines }
    pub fn cursor(&self) -> Position { self.cursor }

    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_flagged()).count()
    }

    pub fn cell(&self, pos: Position) -> Result<&Cell> {
        check_bounds(self.size, pos)?;
        Ok(&self.cells[self.index(pos)])
    }

    /// In-bounds 8-neighbourhood of `pos`, no wraparound.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> {
        let size = self.size;
        DISPLACEMENTS.iter().filter_map(move |&(dx, dy)| {
            let x = pos.x.checked_add_signed(dx)?;
            let y = pos.y.checked_add_signed(dy)?;
            (x < size.width && y < size.height).then_some(Position::new(x, y))
        })
    }

    pub fn reveal(&mut self, pos: Position) -> Result<RevealOutcome> {
        let mut visited = HashSet::new();
        self.reveal_from(pos, &mut visited)
    }

    /// Reveal walk shared by first reveals, flood continuation and chords.
    ///
    /// A hidden cell is opened; if it has no adjacent mines every neighbour is
    /// walked too. An already revealed cell is a chord attempt: when its
    /// flagged neighbours equal its mine count, and it has not chorded before,
    /// every unflagged neighbour is walked. Flagged cells stop the walk. Each
    /// position is processed at most once per `visited` set.
    pub fn reveal_from(&mut self, pos: Position, visited: &mut HashSet<Position>) -> Result<RevealOutcome> {
        check_bounds(self.size, pos)?;

        let mut outcome = RevealOutcome::NoChange;
        let mut stack = vec![pos];
        while let Some(current) = stack.pop() {
            let i = self.index(current);
            if self.cells[i].is_flagged() { continue; }
            if !visited.insert(current) { continue; }

            match self.cells[i].state {
                CellState::Revealed => {
                    if self.cells[i].auto_reveal_triggered { continue; }
                    let flagged = self.neighbors(current).filter(|&n| self.cells[self.index(n)].is_flagged()).count();
                    if flagged != usize::from(self.cells[i].adjacent_mines) { continue; }

                    self.cells[i].auto_reveal_triggered = true;
                    debug!(x = current.x, y = current.y, flagged, "chord fired");
                    stack.extend(
                        self.neighbors(current)
                            .filter(|&n| !self.cells[self.index(n)].is_flagged() && !visited.contains(&n)),
                    );
                }
                CellState::Hidden => {
                    self.cells[i].state = CellState::Revealed;
                    trace!(x = current.x, y = current.y, mine = self.cells[i].is_mine, "revealed cell");
                    if self.cells[i].is_mine {
                        outcome = RevealOutcome::HitMine;
                        continue;
                    }
                    outcome = outcome.max(RevealOutcome::Revealed);
                    if self.cells[i].adjacent_mines == 0 {
                        stack.extend(self.neighbors(current).filter(|n| !visited.contains(n)));
                    }
                }
                CellState::Flagged => {}
            }
        }
        Ok(outcome)
    }

    /// Toggles the flag on `pos`. Returns false when the cell is already revealed.
    pub fn flag(&mut self, pos: Position) -> Result<bool> {
        check_bounds(self.size, pos)?;
        let i = self.index(pos);
        Ok(self.cells[i].toggle_flag())
    }

    /// Discloses the whole board without flood or chord logic. Flags are dropped.
    pub fn reveal_all(&mut self) {
        for cell in &mut self.cells {
            cell.state = CellState::Revealed;
        }
    }

    pub fn all_non_mines_revealed(&self) -> bool {
        self.cells.iter().all(|c| c.is_mine || c.is_revealed())
    }

    pub fn any_mine_revealed(&self) -> bool {
        self.cells.iter().any(|c| c.is_mine && c.is_revealed())
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        self.cursor = Position::new(
            clamp_axis(self.cursor.x, dx, self.size.width),
            clamp_axis(self.cursor.y, dy, self.size.height),
        );
    }

    fn index(&self, pos: Position) -> usize { pos.y * self.size.width + pos.x }
}

impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.size.width).enumerate() {
            if row > 0 { writeln!(f)?; }
            for cell in cells {
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}

/// Checks the board configuration and returns the number of cells.
fn validate(size: Size, mines: usize) -> Result<usize> {
    if size.width == 0 || size.height == 0 {
        return Err(MinesweeperError::EmptyBoard { width: size.width, height: size.height });
    }
    let Some(capacity) = size.area() else {
        return Err(MinesweeperError::BoardTooLarge { width: size.width, height: size.height });
    };
    if mines > capacity {
        return Err(MinesweeperError::TooManyMines { mines, capacity });
    }
    Ok(capacity)
}

fn check_bounds(size: Size, pos: Position) -> Result<()> {
    if pos.x >= size.width || pos.y >= size.height {
        return Err(MinesweeperError::OutOfBounds { x: pos.x, y: pos.y });
    }
    Ok(())
}

fn clamp_axis(value: usize, delta: isize, len: usize) -> usize {
    value.saturating_add_signed(delta).min(len.saturating_sub(1))
}
