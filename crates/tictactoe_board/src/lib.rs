//! Tic-tac-toe board model.
//!
//! This crate is the model half of the game: a fixed-size grid, whose turn
//! it is, and the rules that decide a winner or a draw. Consumers observe
//! changes by registering a [`BoardListener`].
//!
//! # Architecture
//!
//! - **Types**: [`Player`], [`Square`], [`Status`], [`GameOutcome`]
//! - **Board**: [`Board`] applies moves and evaluates the outcome
//! - **Listeners**: [`BoardListener`] receives a notification after every
//!   mutation attempt
//! - **Persistence**: [`persist`] saves and restores whole boards
//!
//! # Example
//!
//! ```
//! use tictactoe_board::{Board, Player, Status};
//!
//! # fn example() -> Result<(), tictactoe_board::NotifyError> {
//! let mut board = Board::new();
//! for (x, y) in [(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)] {
//!     board.make_move(x, y)?;
//! }
//!
//! let outcome = board.outcome();
//! assert_eq!(outcome.status(), Status::Winner);
//! assert_eq!(outcome.winner(), Some(Player::X));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod listener;
mod outcome;
pub mod persist;
mod types;

pub use board::{Board, SIZE};
pub use error::{ListenerError, NotifyError, PersistError, PersistErrorKind};
pub use listener::BoardListener;
pub use outcome::{GameOutcome, Status};
pub use types::{Player, Square};
