//! Board listener that keeps the view's display state current.

use std::cell::RefCell;

use derive_getters::Getters;
use tictactoe_board::{
    Board, BoardListener, GameOutcome, ListenerError, Player, SIZE, Square, Status,
};
use tracing::{debug, instrument};

/// What the view shows, derived from the board after each change.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DisplayState {
    /// Marks in each cell.
    cells: [[Square; SIZE]; SIZE],
    /// Latest outcome.
    outcome: GameOutcome,
    /// Turn or result text shown under the grid.
    status_text: String,
    /// Whether cell clicks are accepted.
    clicks_enabled: bool,
    /// Whether the current game may be saved.
    save_enabled: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            cells: [[Square::Empty; SIZE]; SIZE],
            outcome: GameOutcome::new(Status::InProgress, Player::X),
            status_text: "It is X's turn.".to_string(),
            clicks_enabled: true,
            save_enabled: true,
        }
    }
}

/// Listens to a board and rebuilds [`DisplayState`] on every notification.
#[derive(Debug, Default)]
pub struct BoardPresenter {
    display: RefCell<DisplayState>,
}

impl BoardPresenter {
    /// Creates a presenter showing an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current display state.
    pub fn display(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    /// Rebuilds the display from `board`.
    #[instrument(skip_all, fields(move_count = board.move_count()))]
    pub fn refresh(&self, board: &Board) -> Result<(), ListenerError> {
        let mut display = self
            .display
            .try_borrow_mut()
            .map_err(|_| ListenerError::new("Presenter display is already borrowed"))?;

        let outcome = board.outcome();
        display.cells = *board.rows();
        display.outcome = outcome;
        display.status_text = outcome.to_string();

        match outcome.status() {
            Status::Winner => {
                display.clicks_enabled = false;
                display.save_enabled = false;
            }
            Status::Draw => {
                display.clicks_enabled = true;
                display.save_enabled = false;
            }
            Status::InProgress => {
                display.clicks_enabled = true;
                display.save_enabled = true;
            }
        }

        debug!(status = %outcome.status(), "Display refreshed");
        Ok(())
    }
}

impl BoardListener for BoardPresenter {
    fn handle_board_change(&self, board: &Board) -> Result<(), ListenerError> {
        self.refresh(board)
    }
}
