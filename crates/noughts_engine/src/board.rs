//! The 3x3 grid.

use crate::{Cell, GameError, Symbol, rules};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Side length of the board.
pub const SIZE: usize = 3;

/// 3x3 tic-tac-toe board, indexed by `(row, col)`.
///
/// Cells only ever go from empty to marked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the row-string form (`"X_O"` per row, `_` for empty).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedBoard`] if a row is not exactly three of
    /// `X`, `O` or `_`.
    #[instrument]
    pub fn from_rows(rows: &[&str; SIZE]) -> Result<Self, GameError> {
        let mut board = Self::new();
        for (row, text) in rows.iter().enumerate() {
            let malformed = || GameError::MalformedBoard {
                row: (*text).to_string(),
            };
            let cells: Vec<Cell> = text
                .chars()
                .map(Cell::from_char)
                .collect::<Option<_>>()
                .ok_or_else(malformed)?;
            board.cells[row] = cells.try_into().map_err(|_| malformed())?;
        }
        Ok(board)
    }

    /// Renders each row as a three-character string.
    pub fn rows(&self) -> [String; SIZE] {
        self.cells
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] if either coordinate is not in `0..=2`.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        check_range(row, col)?;
        Ok(self.cells[row][col])
    }

    /// Unchecked lookup for callers iterating known coordinates.
    pub(crate) fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Checks if a cell holds no mark.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] if either coordinate is not in `0..=2`.
    pub fn is_empty(&self, row: usize, col: usize) -> Result<bool, GameError> {
        Ok(self.get(row, col)? == Cell::Empty)
    }

    /// Places a mark.
    ///
    /// The game validates moves before calling this; the checks here only
    /// keep a misused board from overwriting a mark.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfRange`] or [`GameError::CellOccupied`].
    #[instrument(skip(self))]
    pub fn place(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<(), GameError> {
        if !self.is_empty(row, col)? {
            return Err(GameError::CellOccupied { row, col });
        }
        self.cells[row][col] = Cell::Marked(symbol);
        trace!(row, col, %symbol, "Mark placed");
        Ok(())
    }

    /// Returns the symbol owning a complete line, if any.
    pub fn winning_symbol(&self) -> Option<Symbol> {
        rules::check_winner(self)
    }

    /// True once all nine cells are marked.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Number of marked cells.
    pub fn marks(&self) -> usize {
        self.cells().filter(|cell| *cell != Cell::Empty).count()
    }

    /// Iterates cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col] == Cell::Empty)
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, row) in self.cells.iter().enumerate() {
            let line: Vec<String> = row.iter().map(|cell| cell.as_char().to_string()).collect();
            write!(f, "{}", line.join("|"))?;
            if idx < SIZE - 1 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

fn check_range(row: usize, col: usize) -> Result<(), GameError> {
    if row >= SIZE || col >= SIZE {
        return Err(GameError::OutOfRange { row, col });
    }
    Ok(())
}
