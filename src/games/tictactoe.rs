//! # Tic-Tac-Toe Board
//!
//! The 3x3 grid every match is played on. Rules live in the `ttt-rules`
//! crate; this module adds typed marks, moves and a terminal rendering.
//!
//! ## Rules
//! - The first mover places `X`, the second mover places `O`
//! - A mark may only go on an empty cell
//! - Three of one mark in a row, column or diagonal wins
//! - A full grid with no line is a draw

use colored::Colorize;
use std::fmt;
pub use ttt_rules::Verdict;
use ttt_rules::{CELLS, SIDE};

/// Contents of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    /// Encoding used by `ttt-rules`: 1 for X, -1 for O, 0 for empty.
    pub fn value(self) -> i32 {
        match self {
            Mark::Empty => 0,
            Mark::X => 1,
            Mark::O => -1,
        }
    }

    fn from_value(value: i32) -> Self {
        match value {
            1 => Mark::X,
            -1 => Mark::O,
            _ => Mark::Empty,
        }
    }

    fn glyph(self) -> colored::ColoredString {
        match self {
            Mark::Empty => " ".normal(),
            Mark::X => "X".red().bold(),
            Mark::O => "O".blue().bold(),
        }
    }
}

/// A cell position on the board.
///
/// Row and column are 0-based; `index` is the row-major cell number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell(pub usize);

impl Cell {
    pub fn row(self) -> usize {
        self.0 / SIDE
    }

    pub fn col(self) -> usize {
        self.0 % SIDE
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Row: {}, Col: {}]", self.row(), self.col())
    }
}

/// The 3x3 grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [i32; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self { cells: [0; CELLS] }
    }

    /// Mark at `cell`.
    pub fn get(&self, cell: Cell) -> Mark {
        self.cells
            .get(cell.index())
            .map_or(Mark::Empty, |&v| Mark::from_value(v))
    }

    /// Every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        (0..CELLS)
            .filter(|&i| self.cells[i] == 0)
            .map(Cell)
            .collect()
    }

    /// Places `mark` on an empty `cell`.
    ///
    /// Returns false and leaves the board untouched if the cell is taken,
    /// out of range, or `mark` is `Empty`.
    pub fn place(&mut self, cell: Cell, mark: Mark) -> bool {
        match self.cells.get_mut(cell.index()) {
            Some(slot) if *slot == 0 && mark != Mark::Empty => {
                *slot = mark.value();
                true
            }
            _ => false,
        }
    }

    /// Evaluates the board right after `mark` was placed on `cell`.
    pub fn evaluate(&self, cell: Cell, mark: Mark) -> Verdict {
        ttt_rules::evaluate(&self.cells, cell.index(), mark.value())
    }

    /// Number of complete lines owned by `mark`.
    pub fn lines_of(&self, mark: Mark) -> usize {
        ttt_rules::count_lines(&self.cells, mark.value())
    }

    /// True if `mark` owns a line passing through `cell`.
    pub fn line_through(&self, cell: Cell, mark: Mark) -> bool {
        ttt_rules::completes_line(&self.cells, cell.index(), mark.value())
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&v| v == mark.value()).count()
    }

    pub fn is_full(&self) -> bool {
        ttt_rules::is_full(&self.cells)
    }

    /// True if `mark` owns any complete line.
    pub fn has_line(&self, mark: Mark) -> bool {
        ttt_rules::has_line(&self.cells, mark.value())
    }

    /// Rows of marks, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Mark>> {
        (0..SIDE)
            .map(|r| (0..SIDE).map(|c| self.get(Cell(r * SIDE + c))).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().iter().enumerate() {
            for mark in row {
                write!(f, "[{}]", mark.glyph())?;
            }
            if r + 1 < SIDE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
