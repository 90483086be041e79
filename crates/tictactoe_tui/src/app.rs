//! Application state and key handling.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tictactoe_board::{Board, BoardListener, NotifyError, persist};
use tracing::{debug, info, instrument, warn};

use crate::controller::GameController;
use crate::input::{digit_cell, move_cursor};
use crate::presenter::{BoardPresenter, DisplayState};
use crate::settings::Settings;

/// Shown when a save target is already taken.
pub const SAVE_EXISTS_MESSAGE: &str = "A file with that name already exists, please try again.";

/// Shown when a snapshot cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "The file could not be loaded, please try again.";

/// Shown when the user asks to quit.
pub const CONFIRM_QUIT_MESSAGE: &str = "Are you sure you want to exit? (y/n)";

/// Which file prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PromptKind {
    /// Choosing a file to write.
    #[strum(to_string = "Save as")]
    Save,
    /// Choosing a file to read.
    #[strum(to_string = "Load from")]
    Load,
}

/// Input mode of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Playing; keys move the cursor and place marks.
    Playing,
    /// Typing a file path.
    Prompt {
        /// Save or load.
        kind: PromptKind,
        /// Path typed so far.
        input: String,
    },
    /// Waiting for the user to confirm quitting.
    ConfirmQuit,
}

/// What the event loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Leave the event loop.
    Quit,
}

/// Terminal game: owns the board handle, its controller and the presenter.
pub struct App {
    board: Rc<RefCell<Board>>,
    controller: GameController,
    presenter: Rc<BoardPresenter>,
    settings: Settings,
    cursor: (usize, usize),
    mode: Mode,
    message: Option<String>,
    cell_areas: Vec<(Rect, (usize, usize))>,
}

impl App {
    /// Creates an application playing a fresh board.
    #[instrument(skip_all)]
    pub fn new(settings: Settings) -> Self {
        Self::with_board(Board::new(), settings)
    }

    /// Creates an application playing `board`.
    #[instrument(skip_all, fields(move_count = board.move_count()))]
    pub fn with_board(board: Board, settings: Settings) -> Self {
        let presenter = Rc::new(BoardPresenter::new());
        let board = Rc::new(RefCell::new(board));
        let mut app = Self {
            controller: GameController::new(Rc::clone(&board)),
            board,
            presenter,
            settings,
            cursor: (0, 0),
            mode: Mode::Playing,
            message: None,
            cell_areas: Vec::new(),
        };
        app.attach();
        app
    }

    /// Returns the board handle currently in play.
    pub fn board(&self) -> &Rc<RefCell<Board>> {
        &self.board
    }

    /// Returns what the view should show.
    pub fn display(&self) -> DisplayState {
        self.presenter.display()
    }

    /// Returns the cursor as `(row, column)`.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Returns the input mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Returns the transient message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Records where each cell was drawn, for mouse hit testing.
    pub fn set_cell_areas(&mut self, areas: Vec<(Rect, (usize, usize))>) {
        self.cell_areas = areas;
    }

    /// Handles a key press.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Control, NotifyError> {
        if key.kind == KeyEventKind::Release {
            return Ok(Control::Continue);
        }

        match self.mode.clone() {
            Mode::Playing => self.handle_playing_key(key.code),
            Mode::Prompt { kind, input } => {
                self.handle_prompt_key(kind, input, key.code);
                Ok(Control::Continue)
            }
            Mode::ConfirmQuit => Ok(self.handle_confirm_key(key.code)),
        }
    }

    /// Handles a mouse event; a left click on a cell plays it.
    #[instrument(skip(self))]
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<(), NotifyError> {
        if self.mode != Mode::Playing {
            return Ok(());
        }
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return Ok(());
        }

        let point = Position::new(mouse.column, mouse.row);
        let hit = self
            .cell_areas
            .iter()
            .find(|(area, _)| area.contains(point))
            .map(|(_, cell)| *cell);

        match hit {
            Some(cell) => {
                self.cursor = cell;
                self.click(cell)
            }
            None => Ok(()),
        }
    }

    fn handle_playing_key(&mut self, code: KeyCode) -> Result<Control, NotifyError> {
        self.message = None;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.mode = Mode::ConfirmQuit;
            }
            KeyCode::Char('r') => {
                info!("Resetting game");
                self.controller.reset()?;
            }
            KeyCode::Char('s') => {
                if *self.display().save_enabled() {
                    self.open_prompt(PromptKind::Save);
                } else {
                    self.message = Some("Finished games cannot be saved.".to_string());
                }
            }
            KeyCode::Char('o') => self.open_prompt(PromptKind::Load),
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor)?,
            code => {
                if let Some(cell) = digit_cell(code) {
                    self.cursor = cell;
                    self.click(cell)?;
                } else {
                    self.cursor = move_cursor(self.cursor, code);
                }
            }
        }

        Ok(Control::Continue)
    }

    fn handle_prompt_key(&mut self, kind: PromptKind, mut input: String, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.message = None;
                self.mode = Mode::Playing;
            }
            KeyCode::Enter => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return;
                }
                let path = self.settings.resolve(trimmed);
                match kind {
                    PromptKind::Save => self.save_to(&path),
                    PromptKind::Load => self.load_from(&path),
                }
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::Prompt { kind, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::Prompt { kind, input };
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                info!("User quit");
                Control::Quit
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Playing;
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.mode = Mode::Prompt {
            kind,
            input: String::new(),
        };
    }

    fn click(&mut self, (x, y): (usize, usize)) -> Result<(), NotifyError> {
        if !*self.display().clicks_enabled() {
            debug!(x, y, "Click ignored, game is over");
            return Ok(());
        }
        self.controller.register_click(x, y)
    }

    /// Writes the board to `path`, keeping the prompt open on failure.
    fn save_to(&mut self, path: &Path) {
        let result = persist::save(&self.board.borrow(), path);
        match result {
            Ok(()) => {
                info!(path = %path.display(), "Game saved");
                self.message = Some(format!("Game saved to {}.", path.display()));
                self.mode = Mode::Playing;
            }
            Err(e) if e.is_already_exists() => {
                warn!(path = %path.display(), "Save target exists");
                self.message = Some(SAVE_EXISTS_MESSAGE.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.message = Some(format!("The file could not be saved: {}", e.kind()));
            }
        }
    }

    /// Replaces the board with the snapshot at `path`.
    ///
    /// The live board is only swapped out once the snapshot has been read
    /// and validated.
    fn load_from(&mut self, path: &Path) {
        match persist::load(path) {
            Ok(board) => {
                info!(path = %path.display(), "Game loaded");
                self.adopt(board);
                self.message = Some(format!("Loaded {}.", path.display()));
                self.mode = Mode::Playing;
            }
            Err(e) => {
                warn!(error = %e, "Load failed");
                self.message = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Points the app at a new board: new controller, fresh registration.
    fn adopt(&mut self, board: Board) {
        self.board = Rc::new(RefCell::new(board));
        self.controller = GameController::new(Rc::clone(&self.board));
        self.attach();
    }

    /// Registers the presenter on the current board and syncs the display.
    fn attach(&mut self) {
        let listener: Rc<dyn BoardListener> = self.presenter.clone();
        let mut board = self.board.borrow_mut();
        board.add_listener(&listener);
        if let Err(e) = self.presenter.refresh(&board) {
            warn!(error = %e, "Initial display refresh failed");
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("board", &self.board.borrow())
            .field("cursor", &self.cursor)
            .field("mode", &self.mode)
            .field("message", &self.message)
            .finish()
    }
}
