//! Tests for board change notification.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tictactoe_board::{Board, BoardListener, ListenerError, Player, Status};

/// Records the move count and outcome seen on every notification.
#[derive(Default)]
struct Recorder {
    seen: RefCell<Vec<(usize, Status)>>,
}

impl BoardListener for Recorder {
    fn handle_board_change(&self, board: &Board) -> Result<(), ListenerError> {
        self.seen
            .borrow_mut()
            .push((board.move_count(), board.outcome().status()));
        Ok(())
    }
}

/// Fails every notification after bumping a counter.
struct Failing {
    calls: Cell<usize>,
    label: &'static str,
}

impl BoardListener for Failing {
    fn handle_board_change(&self, _board: &Board) -> Result<(), ListenerError> {
        self.calls.set(self.calls.get() + 1);
        Err(ListenerError::new(self.label))
    }
}

/// Appends its id to a shared log, used to observe dispatch order.
struct Ordered {
    id: usize,
    log: Rc<RefCell<Vec<usize>>>,
}

impl BoardListener for Ordered {
    fn handle_board_change(&self, _board: &Board) -> Result<(), ListenerError> {
        self.log.borrow_mut().push(self.id);
        Ok(())
    }
}

fn register(board: &mut Board, listener: Rc<dyn BoardListener>) -> Rc<dyn BoardListener> {
    board.add_listener(&listener);
    listener
}

#[test]
fn test_notified_once_per_call_including_rejections() {
    let recorder = Rc::new(Recorder::default());
    let mut board = Board::new();
    let _handle = register(&mut board, recorder.clone());

    board.make_move(0, 0).unwrap();
    board.make_move(0, 0).unwrap();
    board.make_move(100, 100).unwrap();
    board.reset().unwrap();

    assert_eq!(
        *recorder.seen.borrow(),
        vec![
            (1, Status::InProgress),
            (1, Status::InProgress),
            (1, Status::InProgress),
            (0, Status::InProgress),
        ]
    );
}

#[test]
fn test_listener_sees_settled_state() {
    let recorder = Rc::new(Recorder::default());
    let mut board = Board::new();
    let _handle = register(&mut board, recorder.clone());

    for (x, y) in [(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)] {
        board.make_move(x, y).unwrap();
    }

    assert_eq!(recorder.seen.borrow().last(), Some(&(5, Status::Winner)));
}

#[test]
fn test_duplicate_registration_is_noop() {
    let recorder = Rc::new(Recorder::default());
    let handle: Rc<dyn BoardListener> = recorder.clone();
    let mut board = Board::new();

    board.add_listener(&handle);
    board.add_listener(&handle);
    assert_eq!(board.listener_count(), 1);

    board.make_move(1, 1).unwrap();
    assert_eq!(recorder.seen.borrow().len(), 1);
}

#[test]
fn test_dispatch_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut board = Board::new();
    let handles: Vec<_> = (0..3)
        .map(|id| {
            register(
                &mut board,
                Rc::new(Ordered {
                    id,
                    log: Rc::clone(&log),
                }),
            )
        })
        .collect();

    board.make_move(2, 2).unwrap();
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
    drop(handles);
}

#[test]
fn test_board_does_not_keep_listeners_alive() {
    let mut board = Board::new();
    let recorder: Rc<dyn BoardListener> = Rc::new(Recorder::default());
    board.add_listener(&recorder);
    assert_eq!(board.listener_count(), 1);

    drop(recorder);
    assert_eq!(board.listener_count(), 0);
    board.make_move(0, 0).expect("Dropped listeners are skipped");
    assert_eq!(board.current_turn(), Player::O);
}

#[test]
fn test_failures_collected_from_every_listener() {
    let first = Rc::new(Failing {
        calls: Cell::new(0),
        label: "first",
    });
    let recorder = Rc::new(Recorder::default());
    let second = Rc::new(Failing {
        calls: Cell::new(0),
        label: "second",
    });

    let mut board = Board::new();
    let _a = register(&mut board, first.clone());
    let _b = register(&mut board, recorder.clone());
    let _c = register(&mut board, second.clone());

    let err = board.make_move(1, 1).unwrap_err();

    assert_eq!(err.failures.len(), 2);
    assert_eq!(err.failures[0].message, "first");
    assert_eq!(err.failures[1].message, "second");
    assert_eq!(first.calls.get(), 1);
    assert_eq!(second.calls.get(), 1);
    assert_eq!(recorder.seen.borrow().len(), 1);

    // The move itself was committed.
    assert_eq!(board.move_count(), 1);
    assert_eq!(board.current_turn(), Player::O);
}
