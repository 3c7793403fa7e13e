//! Draw detection logic for tic-tac-toe.

use super::win::check_winner;
use crate::Board;
use tracing::instrument;

/// Checks if every cell holds a mark.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.cells().all(|cell| cell.symbol().is_some())
}

/// A full board with no completed line.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = Board::from_rows(&["XOX", "OXO", "OX_"]).unwrap();
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        let board = Board::from_rows(&["XOX", "OXX", "OXO"]).unwrap();
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let board = Board::from_rows(&["XXX", "OOX", "XOO"]).unwrap();
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
