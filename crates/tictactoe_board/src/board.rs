//! The game board: grid, turn tracking and outcome evaluation.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::listener::Listeners;
use crate::{BoardListener, GameOutcome, NotifyError, Player, Square, Status};

/// Length and width of the board.
pub const SIZE: usize = 3;

/// Tic-tac-toe board.
///
/// `grid[x][y]` addresses row `x`, column `y`. Moves are applied through
/// [`Board::make_move`]; out-of-range or occupied targets are ignored
/// without error. Registered listeners are not part of the board's value:
/// they are skipped by serialization and dropped by `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Square; SIZE]; SIZE],
    turn: Player,
    move_count: usize,
    last_move: Option<(usize, usize)>,
    #[serde(skip)]
    listeners: Listeners,
}

impl Board {
    /// Creates an empty board with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            grid: [[Square::Empty; SIZE]; SIZE],
            turn: Player::X,
            move_count: 0,
            last_move: None,
            listeners: Listeners::default(),
        }
    }

    /// Clears every cell and hands the turn back to X.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if a listener fails. The board is reset
    /// regardless.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), NotifyError> {
        self.grid = [[Square::Empty; SIZE]; SIZE];
        self.turn = Player::X;
        self.move_count = 0;
        self.last_move = None;
        debug!("Board reset");
        self.notify_listeners()
    }

    /// Places the current player's mark at `(x, y)` if the cell is free.
    ///
    /// Out-of-range coordinates and occupied cells leave the board
    /// unchanged. Listeners are notified exactly once either way.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if a listener fails. A valid move is applied
    /// regardless.
    #[instrument(skip(self), fields(player = %self.turn))]
    pub fn make_move(&mut self, x: usize, y: usize) -> Result<(), NotifyError> {
        match self.grid.get(x).and_then(|row| row.get(y)) {
            Some(Square::Empty) => {
                self.grid[x][y] = Square::Occupied(self.turn);
                self.turn = self.turn.opponent();
                self.last_move = Some((x, y));
                self.move_count += 1;
                debug!(move_count = self.move_count, "Move applied");
            }
            Some(Square::Occupied(_)) => debug!("Cell occupied, move ignored"),
            None => debug!("Coordinates out of bounds, move ignored"),
        }
        self.notify_listeners()
    }

    /// Returns the cell at `(x, y)`, or `None` if out of bounds.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<Square> {
        self.grid.get(x).and_then(|row| row.get(y)).copied()
    }

    /// Returns the player who moves next.
    pub fn current_turn(&self) -> Player {
        self.turn
    }

    /// Returns the number of marks placed since the last reset.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Returns the coordinates of the most recent mark.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Returns the grid rows.
    pub fn rows(&self) -> &[[Square; SIZE]; SIZE] {
        &self.grid
    }

    /// Evaluates the board.
    ///
    /// Only the row, column and diagonals through the last move are
    /// checked, since any new line must include the cell just played.
    #[instrument(skip(self), fields(move_count = self.move_count))]
    pub fn outcome(&self) -> GameOutcome {
        if self.move_count > 2 * SIZE - 2
            && let Some((x, y)) = self.last_move
            && self.completes_line(x, y)
        {
            // The turn already flipped to the opponent when the mark went down.
            return GameOutcome::new(Status::Winner, self.turn.opponent());
        }

        if self.move_count == SIZE * SIZE {
            return GameOutcome::new(Status::Draw, self.turn);
        }

        GameOutcome::new(Status::InProgress, self.turn)
    }

    /// Registers a listener for change notifications.
    ///
    /// The board keeps a weak handle only. Registering the same listener
    /// twice has no effect.
    #[instrument(skip_all)]
    pub fn add_listener(&mut self, listener: &Rc<dyn BoardListener>) {
        if self.listeners.add(listener) {
            debug!(listeners = self.listeners.live_count(), "Listener registered");
        }
    }

    /// Returns the number of registered listeners still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners.live_count()
    }

    /// Checks every line through `(x, y)` against the mark placed there.
    fn completes_line(&self, x: usize, y: usize) -> bool {
        let Some(mark) = self.cell_at(x, y) else {
            return false;
        };
        if mark.is_empty() {
            return false;
        }

        let row = (0..SIZE).all(|col| self.grid[x][col] == mark);
        let column = (0..SIZE).all(|r| self.grid[r][y] == mark);
        let diagonal = x == y && (0..SIZE).all(|i| self.grid[i][i] == mark);
        let anti_diagonal =
            x == SIZE - 1 - y && (0..SIZE).all(|i| self.grid[i][SIZE - 1 - i] == mark);

        row || column || diagonal || anti_diagonal
    }

    fn notify_listeners(&mut self) -> Result<(), NotifyError> {
        let live = self.listeners.live();
        Listeners::dispatch(&live, self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (x, row) in self.grid.iter().enumerate() {
            let line: Vec<String> = row.iter().map(|sq| sq.symbol().to_string()).collect();
            write!(f, "{}", line.join("|"))?;
            if x + 1 < SIZE {
                write!(f, "\n{}\n", vec!["-"; SIZE].join("+"))?;
            }
        }
        Ok(())
    }
}
