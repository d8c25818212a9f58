#![no_std]

//! Win and draw detection for a 3x3 grid stored as a flat, row-major array.
//!
//! Cells hold `0` for empty, `1` for the first mover and `-1` for the second
//! mover. Nothing here allocates or locks; callers own the grid.

/// Width and height of the grid.
pub const SIDE: usize = 3;
/// Number of cells in the grid.
pub const CELLS: usize = SIDE * SIDE;

/// Every line of three: rows, columns, then both diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a grid right after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Moves remain and nobody has a line.
    Ongoing,
    /// The mover completed at least one line.
    Won,
    /// The grid is full with no line for the mover.
    Draw,
}

/// Returns true if any line passing through `cell` is entirely `player`.
///
/// Only lines through the last placed cell can have been completed by that
/// move, so this is the check to run after each placement.
pub fn completes_line(board: &[i32; CELLS], cell: usize, player: i32) -> bool {
    if cell >= CELLS || player == 0 {
        return false;
    }
    LINES
        .iter()
        .filter(|line| line.contains(&cell))
        .any(|line| line.iter().all(|&i| board[i] == player))
}

/// Number of complete lines owned by `player` anywhere on the grid.
pub fn count_lines(board: &[i32; CELLS], player: i32) -> usize {
    if player == 0 {
        return 0;
    }
    LINES
        .iter()
        .filter(|line| line.iter().all(|&i| board[i] == player))
        .count()
}

/// True if `player` owns any complete line.
pub fn has_line(board: &[i32; CELLS], player: i32) -> bool {
    count_lines(board, player) > 0
}

/// True when no empty cell remains.
pub fn is_full(board: &[i32; CELLS]) -> bool {
    board.iter().all(|&c| c != 0)
}

/// Evaluates the grid after `player` placed a mark on `cell`.
pub fn evaluate(board: &[i32; CELLS], cell: usize, player: i32) -> Verdict {
    if completes_line(board, cell, player) {
        Verdict::Won
    } else if is_full(board) {
        Verdict::Draw
    } else {
        Verdict::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_no_lines() {
        let board = [0; CELLS];
        assert!(!has_line(&board, 1));
        assert!(!has_line(&board, -1));
        assert!(!is_full(&board));
        assert_eq!(evaluate(&board, 4, 1), Verdict::Ongoing);
    }

    #[test]
    fn test_row_column_and_diagonals() {
        for line in LINES.iter() {
            let mut board = [0; CELLS];
            for &i in line {
                board[i] = -1;
            }
            assert_eq!(count_lines(&board, -1), 1);
            for &i in line {
                assert!(completes_line(&board, i, -1));
                assert_eq!(evaluate(&board, i, -1), Verdict::Won);
            }
            assert!(!has_line(&board, 1));
        }
    }

    #[test]
    fn test_line_not_through_last_cell_is_ignored() {
        // X owns the top row, but the last move was an X in the bottom corner.
        let board = [1, 1, 1, -1, -1, 0, 0, 0, 1];
        assert!(!completes_line(&board, 8, 1));
        assert!(completes_line(&board, 0, 1));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let board = [1, -1, 1, 1, -1, -1, -1, 1, 1];
        assert!(is_full(&board));
        assert!(!has_line(&board, 1));
        assert!(!has_line(&board, -1));
        assert_eq!(evaluate(&board, 8, 1), Verdict::Draw);
    }

    #[test]
    fn test_final_move_can_complete_two_lines() {
        // X X .
        // O X O
        // X O O   then X plays cell 2: top row and anti-diagonal
        let mut board = [1, 1, 0, -1, 1, -1, 1, -1, -1];
        board[2] = 1;
        assert_eq!(count_lines(&board, 1), 2);
        assert_eq!(evaluate(&board, 2, 1), Verdict::Won);
    }

    #[test]
    fn test_out_of_range_cell() {
        let board = [1; CELLS];
        assert!(!completes_line(&board, CELLS, 1));
        assert!(!completes_line(&board, 0, 0));
    }
}
