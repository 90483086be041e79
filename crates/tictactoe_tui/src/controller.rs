//! Controller between the view and the board.

use std::cell::RefCell;
use std::rc::Rc;

use tictactoe_board::{Board, NotifyError};
use tracing::instrument;

/// Forwards user actions to the board.
///
/// The view never mutates the board directly; it goes through this type so
/// presentation and state changes stay decoupled.
#[derive(Debug, Clone)]
pub struct GameController {
    board: Rc<RefCell<Board>>,
}

impl GameController {
    /// Creates a controller for the given board.
    pub fn new(board: Rc<RefCell<Board>>) -> Self {
        Self { board }
    }

    /// Registers a click on cell `(x, y)`.
    #[instrument(skip(self))]
    pub fn register_click(&self, x: usize, y: usize) -> Result<(), NotifyError> {
        self.board.borrow_mut().make_move(x, y)
    }

    /// Starts a new game on the same board.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), NotifyError> {
        self.board.borrow_mut().reset()
    }
}
