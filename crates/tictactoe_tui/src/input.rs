//! Keyboard navigation over the grid.

use crossterm::event::KeyCode;
use tictactoe_board::SIZE;

/// Moves the cursor `(row, column)` for arrow and `hjkl` keys.
///
/// The cursor stops at the edges. Other keys leave it unchanged.
pub fn move_cursor(cursor: (usize, usize), key: KeyCode) -> (usize, usize) {
    let (row, col) = cursor;
    match key {
        KeyCode::Up | KeyCode::Char('k') => (row.saturating_sub(1), col),
        KeyCode::Down | KeyCode::Char('j') => ((row + 1).min(SIZE - 1), col),
        KeyCode::Left | KeyCode::Char('h') => (row, col.saturating_sub(1)),
        KeyCode::Right | KeyCode::Char('l') => (row, (col + 1).min(SIZE - 1)),
        _ => cursor,
    }
}

/// Maps a digit key to a cell in row-major order, `1` being the top left.
pub fn digit_cell(key: KeyCode) -> Option<(usize, usize)> {
    let KeyCode::Char(c) = key else {
        return None;
    };
    let digit = c.to_digit(10)? as usize;
    (1..=SIZE * SIZE)
        .contains(&digit)
        .then(|| ((digit - 1) / SIZE, (digit - 1) % SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_within_grid() {
        assert_eq!(move_cursor((1, 1), KeyCode::Up), (0, 1));
        assert_eq!(move_cursor((1, 1), KeyCode::Down), (2, 1));
        assert_eq!(move_cursor((1, 1), KeyCode::Left), (1, 0));
        assert_eq!(move_cursor((1, 1), KeyCode::Char('l')), (1, 2));
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor((0, 0), KeyCode::Up), (0, 0));
        assert_eq!(move_cursor((0, 0), KeyCode::Left), (0, 0));
        assert_eq!(move_cursor((SIZE - 1, SIZE - 1), KeyCode::Down), (SIZE - 1, SIZE - 1));
        assert_eq!(move_cursor((SIZE - 1, SIZE - 1), KeyCode::Right), (SIZE - 1, SIZE - 1));
    }

    #[test]
    fn test_digit_cells() {
        assert_eq!(digit_cell(KeyCode::Char('1')), Some((0, 0)));
        assert_eq!(digit_cell(KeyCode::Char('5')), Some((1, 1)));
        assert_eq!(digit_cell(KeyCode::Char('9')), Some((2, 2)));
        assert_eq!(digit_cell(KeyCode::Char('0')), None);
        assert_eq!(digit_cell(KeyCode::Char('x')), None);
        assert_eq!(digit_cell(KeyCode::Enter), None);
    }
}
