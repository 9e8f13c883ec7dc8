//! The pipeview application: feeds a command's output into the viewport and
//! maps keys and `:` commands onto viewport operations.

pub mod commands;

pub use commands::{Command, CommandError};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, ColorRole, KeyAction, ViewportError};
use crate::source::{pipe, InputSource, LineBuffer, LineSource};
use crate::template::{Symbols, Template};
use crate::viewport::{self, CommandInput, TerminalSession, Viewport};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Placeholders available in the line format: `%s` line text, `%n` line number.
pub const LINE_SYMBOLS: &str = "sn";

/// Prefix shown on the command row while typing a command.
const COMMAND_PREFIX: &str = ":";

/// How long the event loop waits for a key before polling input again.
const TICK: Duration = Duration::from_millis(100);

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the event loop.
    Quit,
}

/// The running application.
///
/// Generic over backend to support testing with TestBackend.
pub struct App<B: Backend> {
    viewport: Viewport<B>,
    lines: LineBuffer,
    input: InputSource,
    key_bindings: KeyBindings,
    template: Template,
    symbols: Symbols,
    follow: bool,
    horizontal_step: usize,
    /// Text set with `:bottom <text>`, shown instead of the status line.
    bottom_override: Option<String>,
    /// One-shot feedback (errors from commands), cleared on the next key.
    message: Option<String>,
    session: Option<TerminalSession>,
}

impl<B: Backend> App<B> {
    /// Build the application around a viewport and an input source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Template` if the configured line format is invalid.
    pub fn new(
        mut viewport: Viewport<B>,
        input: InputSource,
        config: &ResolvedConfig,
    ) -> Result<Self, AppError> {
        let symbols = Symbols::new(LINE_SYMBOLS);
        let template = Template::parse(&symbols, &config.format)?;

        for role in ColorRole::ALL {
            viewport.set_color(role, config.colors.get(role));
        }
        viewport.set_pager_mode(config.pager_mode);
        viewport.set_top_text(Some(&input.describe()));
        viewport.set_top_enabled(config.top_bar);
        if config.bottom_bar {
            viewport.set_bottom_text(Some(""));
        }

        let mut app = Self {
            viewport,
            lines: LineBuffer::new(),
            input,
            key_bindings: KeyBindings::default(),
            template,
            symbols,
            follow: config.follow,
            horizontal_step: config.horizontal_step.max(1),
            bottom_override: None,
            message: None,
            session: None,
        };
        app.viewport.on_source_count_changed(&app.lines, true);
        app.refresh_status();
        Ok(app)
    }

    /// Hand the terminal session to the app so `!command` can suspend it.
    /// Dropping the app restores the terminal.
    pub fn with_session(mut self, session: TerminalSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Run the event loop until the user quits.
    ///
    /// Event-driven: keys are handled as they arrive; between keys the input
    /// source is polled every tick. Only dirty regions are repainted.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the terminal or the input source fails.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.draw()?;

        loop {
            if event::poll(TICK).map_err(ViewportError::Terminal)? {
                match event::read().map_err(ViewportError::Terminal)? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if self.handle_key(key)? == Flow::Quit {
                            info!("quit requested");
                            return Ok(());
                        }
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "resize event");
                        self.viewport.request_resize();
                    }
                    _ => {}
                }
            }

            self.tick()?;
            if self.viewport.needs_draw() {
                self.draw()?;
            }
        }
    }

    /// Poll the input source and refresh the status bar.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Input` if reading the input failed.
    pub fn tick(&mut self) -> Result<(), AppError> {
        self.poll_input()?;
        self.refresh_status();
        Ok(())
    }

    /// Run one draw pass.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Viewport` if the terminal cannot be written.
    pub fn draw(&mut self) -> Result<(), AppError> {
        self.viewport.draw(&self.lines)?;
        Ok(())
    }

    fn poll_input(&mut self) -> Result<(), AppError> {
        let raw = self.input.poll()?;
        if raw.is_empty() {
            return Ok(());
        }
        debug!(count = raw.len(), "new input lines");

        for line in raw {
            let number = self.lines.len() + 1;
            self.symbols.set('s', line);
            self.symbols.set('n', number.to_string());
            self.lines.push(self.template.render(&self.symbols));
        }
        self.viewport.on_source_count_changed(&self.lines, false);

        if self.follow {
            self.select_last();
        }
        Ok(())
    }

    /// Handle a single keyboard event.
    ///
    /// While the command line is active every key goes to it first; Esc or
    /// Ctrl+C cancel it.
    ///
    /// # Errors
    ///
    /// Returns `AppError` for terminal failures while running a shell command.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Flow, AppError> {
        self.message = None;

        if self.viewport.command_active() {
            return self.handle_command_key(key);
        }

        let Some(action) = self.key_bindings.get(key) else {
            return Ok(Flow::Continue);
        };
        Ok(self.handle_action(action))
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Result<Flow, AppError> {
        let cancel = key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if cancel {
            self.viewport.leave_command();
            return Ok(Flow::Continue);
        }

        match self.viewport.feed_command_key(key) {
            Ok(CommandInput::Commit) => {
                let text = self.viewport.leave_command();
                self.execute(&text)
            }
            Ok(CommandInput::Handled | CommandInput::Ignored) => Ok(Flow::Continue),
            Err(ViewportError::BufferOverflow { capacity }) => {
                self.message = Some(format!("command line full ({} characters)", capacity));
                Ok(Flow::Continue)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a key action.
    pub fn handle_action(&mut self, action: KeyAction) -> Flow {
        let page = isize::try_from(self.viewport.list_height().max(1)).unwrap_or(isize::MAX);
        match action {
            KeyAction::SelectUp => self.move_selection(-1),
            KeyAction::SelectDown => self.move_selection(1),
            KeyAction::PageUp => self.move_selection(-page),
            KeyAction::PageDown => self.move_selection(page),
            KeyAction::SelectFirst => {
                self.follow = false;
                self.select(0);
            }
            KeyAction::SelectLast => self.select_last(),
            KeyAction::ScrollLeft => {
                self.viewport.scroll_left(self.horizontal_step);
            }
            KeyAction::ScrollRight => self.viewport.scroll_right(self.horizontal_step),
            KeyAction::ResetHorizontal => self.viewport.reset_horizontal(),
            KeyAction::TogglePagerMode => {
                let pager = !self.viewport.pager_mode();
                self.viewport.set_pager_mode(pager);
            }
            KeyAction::ToggleFollow => self.set_follow(!self.follow),
            KeyAction::TogglePause => {
                if self.input.is_paused() {
                    self.input.resume();
                } else {
                    self.input.pause();
                }
                debug!(paused = self.input.is_paused(), "input delivery toggled");
            }
            KeyAction::ToggleTopBar => {
                let enable = !self.viewport.top_bar().is_enabled();
                if enable && self.viewport.top_bar().text().is_empty() {
                    self.viewport.set_top_text(Some(&self.input.describe()));
                } else {
                    self.viewport.set_top_enabled(enable);
                }
            }
            KeyAction::ToggleBottomBar => {
                let enable = !self.viewport.bottom_bar().is_enabled();
                self.viewport.set_bottom_enabled(enable);
            }
            KeyAction::StartCommand => self.viewport.enter_command(COMMAND_PREFIX),
            KeyAction::Redraw => self.viewport.redraw(),
            KeyAction::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Execute committed command line text.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the terminal cannot be suspended or resumed
    /// around a shell command.
    pub fn execute(&mut self, text: &str) -> Result<Flow, AppError> {
        let command = match commands::parse(text) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(Flow::Continue),
            Err(e) => {
                debug!(input = text, error = %e, "rejected command");
                self.message = Some(e.to_string());
                return Ok(Flow::Continue);
            }
        };
        info!(?command, "executing command");

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::GoTo(line) => match self.viewport.set_selection(&self.lines, line - 1) {
                Ok(()) => self.follow = false,
                Err(ViewportError::OutOfRange { count, .. }) => {
                    self.message = Some(format!("no line {} ({} lines)", line, count));
                }
                Err(e) => return Err(e.into()),
            },
            Command::PagerMode(pager) => self.viewport.set_pager_mode(pager),
            Command::Follow(follow) => self.set_follow(follow),
            Command::TopBar(text) => {
                self.viewport.set_top_text(text.as_deref());
            }
            Command::BottomBar(text) => {
                self.viewport.set_bottom_text(text.as_deref());
                self.bottom_override = text;
            }
            Command::Shell(command) => self.run_shell(&command)?,
            Command::Color { role, pair } => {
                self.viewport.set_color(role, pair);
            }
        }
        Ok(Flow::Continue)
    }

    /// Run `command` in the foreground with the terminal handed back.
    fn run_shell(&mut self, command: &str) -> Result<(), AppError> {
        if let Some(session) = self.session.as_mut() {
            session.suspend()?;
        }
        let result = pipe::exec_shell(command);
        if let Some(session) = self.session.as_mut() {
            session.resume()?;
        }
        self.viewport.redraw();

        match result {
            Ok(true) => {}
            Ok(false) => self.message = Some(format!("'{}' failed", command)),
            Err(e) => {
                warn!(error = %e, "shell command could not start");
                self.message = Some(e.to_string());
            }
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        if delta < 0 {
            self.follow = false;
        }
        self.viewport.move_selection_by(&self.lines, delta);
    }

    fn select(&mut self, vid: usize) {
        // Only fails on an empty buffer, where there is nothing to select.
        let _ = self.viewport.set_selection(&self.lines, vid);
    }

    fn select_last(&mut self) {
        if let Some(last) = self.lines.len().checked_sub(1) {
            if self.viewport.selection() != last {
                self.select(last);
            }
        }
    }

    fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
        if follow {
            self.select_last();
        }
    }

    /// Put the status line in the bottom bar unless the user replaced it or
    /// the bar is hidden.
    fn refresh_status(&mut self) {
        if self.bottom_override.is_some() || !self.viewport.bottom_bar().is_enabled() {
            return;
        }
        let status = self.status_line();
        if self.viewport.bottom_bar().text() != status {
            self.viewport.set_bottom_text(Some(&status));
        }
    }

    /// `line N/M  mode  state[  follow][  | message]`
    pub fn status_line(&mut self) -> String {
        let count = self.lines.len();
        let line = if count == 0 {
            0
        } else {
            self.viewport.selection() + 1
        };
        let mode = if self.viewport.pager_mode() {
            "pager"
        } else {
            "continuous"
        };
        let state = if self.input.is_paused() {
            "paused"
        } else if self.input.is_live() {
            "live"
        } else {
            "ended"
        };

        let mut status = format!("line {}/{}  {}  {}", line, count, mode, state);
        if self.follow {
            status.push_str("  follow");
        }
        if let Some(message) = &self.message {
            status.push_str("  | ");
            status.push_str(message);
        }
        status
    }

    /// The viewport being drawn.
    pub fn viewport(&self) -> &Viewport<B> {
        &self.viewport
    }

    /// Mutable access to the viewport.
    pub fn viewport_mut(&mut self) -> &mut Viewport<B> {
        &mut self.viewport
    }

    /// Every line read so far.
    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    /// Whether more input can still arrive.
    pub fn input_live(&mut self) -> bool {
        self.input.is_live()
    }

    /// Whether the selection tracks the last line.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Message shown after the status text, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Set up the terminal and run the application over `input`.
///
/// The terminal is restored when this returns, on success or error.
///
/// # Errors
///
/// Returns `AppError` if the terminal cannot be set up, the line format is
/// invalid, or the event loop fails.
pub fn run_with_source(input: InputSource, config: &ResolvedConfig) -> Result<(), AppError> {
    // Reject a bad format while the terminal is still untouched.
    Template::parse(&Symbols::new(LINE_SYMBOLS), &config.format)?;

    let (session, viewport) = viewport::init()?;
    let mut app = App::new(viewport, input, config)?.with_session(session);
    info!(source = %app.input.describe(), "starting event loop");
    app.run()
}

// ===== Tests =====

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
