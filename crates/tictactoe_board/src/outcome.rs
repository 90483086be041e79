//! Result of evaluating a board.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::Player;

/// Tri-state status of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
pub enum Status {
    /// No line completed and free cells remain.
    #[default]
    #[strum(to_string = "In progress")]
    InProgress,
    /// The last move completed a line.
    Winner,
    /// Every cell is filled and nobody won.
    Draw,
}

/// Snapshot of a board's outcome, built fresh on each query.
///
/// For [`Status::Winner`] the `turn` is the player who completed the line.
/// Otherwise it is the player who moves next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct GameOutcome {
    status: Status,
    turn: Player,
}

impl GameOutcome {
    /// Returns the status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the player associated with this outcome.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            Status::Winner => Some(self.turn),
            Status::InProgress | Status::Draw => None,
        }
    }

    /// Returns true if the game has been won or drawn.
    pub fn is_over(&self) -> bool {
        !matches!(self.status, Status::InProgress)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Status::InProgress => write!(f, "It is {}'s turn.", self.turn),
            Status::Winner => write!(f, "{} wins.", self.turn),
            Status::Draw => write!(f, "It's a draw!"),
        }
    }
}
