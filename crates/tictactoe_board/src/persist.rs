//! Saving and restoring boards.
//!
//! A snapshot is the JSON encoding of a [`Board`]'s data: grid, turn, move
//! count and last move. Listener registrations are never written. Loading
//! always builds a fresh board that the caller adopts wholesale, so a failed
//! load cannot disturb the board already in use.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{Board, PersistError, PersistErrorKind, Player, SIZE, Square};

/// Encodes a board as snapshot bytes.
#[instrument(skip(board), fields(move_count = board.move_count()))]
pub fn to_bytes(board: &Board) -> Result<Vec<u8>, PersistError> {
    serde_json::to_vec_pretty(board)
        .map_err(|e| PersistError::new(PersistErrorKind::Encode(e.to_string())))
}

/// Decodes and validates snapshot bytes.
///
/// # Errors
///
/// Returns [`PersistErrorKind::Decode`] for malformed input and
/// [`PersistErrorKind::InvalidSnapshot`] when the decoded board could not
/// have been reached by play.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn from_bytes(bytes: &[u8]) -> Result<Board, PersistError> {
    let board: Board = serde_json::from_slice(bytes)?;
    validate(&board)?;
    debug!(move_count = board.move_count(), "Snapshot decoded");
    Ok(board)
}

/// Writes a snapshot to a new file at `path`.
///
/// # Errors
///
/// Fails with [`PersistErrorKind::AlreadyExists`] if `path` exists; the
/// existing file is left untouched. If writing fails after the file was
/// created, the partial file is removed.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save(board: &Board, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let bytes = to_bytes(board)?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => {
                PersistError::new(PersistErrorKind::AlreadyExists(path.display().to_string()))
            }
            _ => PersistError::new(PersistErrorKind::Io(e.to_string())),
        })?;

    write_or_discard(file, &bytes, path)?;
    info!(bytes = bytes.len(), "Board saved");
    Ok(())
}

/// Writes `bytes` to the file freshly created at `path`.
///
/// On failure the writer is closed and `path` is removed, so no partial
/// snapshot is left behind.
fn write_or_discard<W: Write>(
    mut writer: W,
    bytes: &[u8],
    path: &Path,
) -> Result<(), PersistError> {
    if let Err(e) = writer.write_all(bytes).and_then(|()| writer.flush()) {
        warn!(error = %e, "Write failed, removing partial snapshot");
        drop(writer);
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(error = %remove_err, "Could not remove partial snapshot");
        }
        return Err(PersistError::new(PersistErrorKind::Io(e.to_string())));
    }
    Ok(())
}

/// Reads a snapshot from `path`.
///
/// # Errors
///
/// Fails with [`PersistErrorKind::Io`] if the file cannot be read, or with
/// the errors of [`from_bytes`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Board, PersistError> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| PersistError::new(PersistErrorKind::Io(e.to_string())))?;
    let board = from_bytes(&bytes)?;
    info!(move_count = board.move_count(), "Board loaded");
    Ok(board)
}

/// Checks that a decoded board satisfies the play invariants.
fn validate(board: &Board) -> Result<(), PersistError> {
    let squares = || board.rows().iter().flatten();
    let count = |player: Player| {
        squares()
            .filter(|sq| **sq == Square::Occupied(player))
            .count()
    };
    let xs = count(Player::X);
    let os = count(Player::O);

    if xs + os != board.move_count() {
        return Err(invalid(format!(
            "move count {} does not match {} placed marks",
            board.move_count(),
            xs + os
        )));
    }

    if xs != os && xs != os + 1 {
        return Err(invalid(format!("{} X marks against {} O marks", xs, os)));
    }

    let expected_turn = if board.move_count() % 2 == 0 {
        Player::X
    } else {
        Player::O
    };
    if board.current_turn() != expected_turn {
        return Err(invalid(format!(
            "{} to move after {} moves",
            board.current_turn(),
            board.move_count()
        )));
    }

    match board.last_move() {
        None if board.move_count() > 0 => Err(invalid("marks placed but no last move".to_string())),
        Some((x, y)) if x >= SIZE || y >= SIZE => {
            Err(invalid(format!("last move ({}, {}) out of bounds", x, y)))
        }
        Some((x, y)) if board.cell_at(x, y) != Some(Square::Occupied(expected_turn.opponent())) => {
            Err(invalid(format!("last move ({}, {}) does not hold the last mark", x, y)))
        }
        _ => Ok(()),
    }
}

#[track_caller]
fn invalid(reason: String) -> PersistError {
    PersistError::new(PersistErrorKind::InvalidSnapshot(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    /// Writer whose every write fails.
    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, b"{").unwrap();

        let err = write_or_discard(BrokenWriter, b"{}", &path).unwrap_err();

        assert!(matches!(err.kind(), PersistErrorKind::Io(msg) if msg.contains("disk full")));
        assert!(!path.exists());
    }

    #[test]
    fn test_successful_write_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.json");
        let file = std::fs::File::create(&path).unwrap();

        write_or_discard(file, b"{}", &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_empty_board_round_trips() {
        let board = Board::new();
        let decoded = from_bytes(&to_bytes(&board).unwrap()).unwrap();
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_garbage_rejected_as_decode_error() {
        let err = from_bytes(b"not a board").unwrap_err();
        assert!(matches!(err.kind(), PersistErrorKind::Decode(_)));
    }

    #[test]
    fn test_mismatched_move_count_rejected() {
        let mut board = Board::new();
        board.make_move(0, 0).unwrap();
        let text = String::from_utf8(to_bytes(&board).unwrap()).unwrap();
        let tampered = text.replace("\"move_count\": 1", "\"move_count\": 3");
        assert_ne!(text, tampered);

        let err = from_bytes(tampered.as_bytes()).unwrap_err();
        assert!(matches!(err.kind(), PersistErrorKind::InvalidSnapshot(_)));
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mut board = Board::new();
        board.make_move(1, 1).unwrap();
        let text = String::from_utf8(to_bytes(&board).unwrap()).unwrap();
        let tampered = text.replace("\"turn\": \"O\"", "\"turn\": \"X\"");
        assert_ne!(text, tampered);

        let err = from_bytes(tampered.as_bytes()).unwrap_err();
        assert!(matches!(err.kind(), PersistErrorKind::InvalidSnapshot(_)));
    }

    #[test]
    fn test_last_move_must_hold_last_mark() {
        let mut board = Board::new();
        board.make_move(0, 0).unwrap();
        board.make_move(2, 2).unwrap();
        let text = String::from_utf8(to_bytes(&board).unwrap()).unwrap();
        let compact: String = text.split_whitespace().collect();
        let tampered = compact.replace("\"last_move\":[2,2]", "\"last_move\":[0,0]");
        assert_ne!(compact, tampered);

        let err = from_bytes(tampered.as_bytes()).unwrap_err();
        assert!(matches!(err.kind(), PersistErrorKind::InvalidSnapshot(_)));
    }
}
