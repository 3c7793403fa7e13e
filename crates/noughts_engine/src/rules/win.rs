//! Win detection logic for tic-tac-toe.

use crate::{Board, Symbol};
use tracing::instrument;

/// The 8 winning lines as `(row, col)` triples.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Checks if there is a winner on the board.
///
/// Returns the symbol that fills any complete line, `None` otherwise.
/// After a single legal move at most one symbol can own a line, so the
/// first match is the answer.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Symbol> {
    LINES.iter().find_map(|&[a, b, c]| {
        let symbol = board.cell(a.0, a.1).symbol()?;
        let owned = |(row, col): (usize, usize)| board.cell(row, col).symbol() == Some(symbol);
        (owned(b) && owned(c)).then_some(symbol)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: [&str; 3]) -> Board {
        Board::from_rows(&rows).expect("Valid rows")
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in LINES {
            let mut board = Board::new();
            for (row, col) in line {
                board.place(row, col, Symbol::O).expect("Empty cell");
            }
            assert_eq!(check_winner(&board), Some(Symbol::O), "line {line:?}");
        }
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_from(["XXX", "OO_", "___"]);
        assert_eq!(check_winner(&board), Some(Symbol::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_from(["X_O", "XO_", "O_X"]);
        assert_eq!(check_winner(&board), Some(Symbol::O));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_from(["XXO", "___", "___"]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_double_line_same_symbol() {
        // Final X at the corner completes a row and a column at once.
        let board = board_from(["XXX", "XOO", "XOO"]);
        assert_eq!(check_winner(&board), Some(Symbol::X));
    }
}
