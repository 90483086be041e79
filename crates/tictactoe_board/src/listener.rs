//! Change notification for board observers.

use std::rc::{Rc, Weak};

use tracing::{debug, instrument, warn};

use crate::{Board, ListenerError, NotifyError};

/// Receives a notification after every mutation attempt on a [`Board`].
///
/// The board hands itself to the callback, so the listener sees the fully
/// settled state without reaching back through a shared handle. Listeners
/// are invoked even when a move was rejected; compare against the board's
/// contents to find out whether anything changed.
pub trait BoardListener {
    /// Called synchronously after [`Board::make_move`] or [`Board::reset`].
    fn handle_board_change(&self, board: &Board) -> Result<(), ListenerError>;
}

/// Non-owning registry of listeners, kept in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<Weak<dyn BoardListener>>,
}

impl Listeners {
    /// Registers a listener unless the same allocation is already present.
    ///
    /// Returns true if the listener was added.
    pub(crate) fn add(&mut self, listener: &Rc<dyn BoardListener>) -> bool {
        let target = Rc::as_ptr(listener);
        let present = self
            .entries
            .iter()
            .any(|entry| std::ptr::addr_eq(entry.as_ptr(), target));
        if present {
            return false;
        }
        self.entries.push(Rc::downgrade(listener));
        true
    }

    /// Number of listeners that are still alive.
    pub(crate) fn live_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.strong_count() > 0).count()
    }

    /// Drops dead entries and returns strong handles to the rest.
    pub(crate) fn live(&mut self) -> Vec<Rc<dyn BoardListener>> {
        self.entries.retain(|entry| entry.strong_count() > 0);
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Invokes each listener in order, collecting failures.
    #[instrument(skip_all, fields(move_count = board.move_count()))]
    pub(crate) fn dispatch(
        live: &[Rc<dyn BoardListener>],
        board: &Board,
    ) -> Result<(), NotifyError> {
        debug!(listeners = live.len(), "Dispatching board change");

        let failures: Vec<ListenerError> = live
            .iter()
            .filter_map(|listener| listener.handle_board_change(board).err())
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            warn!(failed = failures.len(), "Listeners failed during dispatch");
            Err(NotifyError::new(failures))
        }
    }
}

impl Clone for Listeners {
    /// Registrations belong to one board instance and are not copied.
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for Listeners {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Listeners {}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("live", &self.live_count())
            .finish()
    }
}
