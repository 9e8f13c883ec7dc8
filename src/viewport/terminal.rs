//! Terminal setup, suspension and restore.

use super::resize::ResizeFlag;
use super::Viewport;
use crate::model::ViewportError;
use crossterm::{
    ExecutableCommand,
    cursor::Show,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use tracing::{debug, warn};

/// Owns the terminal modes the viewport needs.
///
/// While a session is active the terminal is in raw mode on the alternate
/// screen. Dropping the session restores the normal screen.
#[derive(Debug)]
pub struct TerminalSession {
    active: bool,
    #[cfg(unix)]
    sigwinch: Option<signal_hook::SigId>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen, and route `SIGWINCH` into
    /// `resize`.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::Init` if the terminal cannot be configured.
    pub fn start(resize: &ResizeFlag) -> Result<Self, ViewportError> {
        enter_modes().map_err(ViewportError::Init)?;
        let session = Self {
            active: true,
            #[cfg(unix)]
            sigwinch: match resize.register_sigwinch() {
                Ok(id) => Some(id),
                Err(e) => {
                    // Event::Resize from crossterm still reaches the loop.
                    warn!(error = %e, "could not install SIGWINCH handler");
                    None
                }
            },
        };
        #[cfg(not(unix))]
        let _ = resize;
        debug!("terminal session started");
        Ok(session)
    }

    /// Give the terminal back to the shell, e.g. while a child command
    /// runs in the foreground. No-op when already suspended.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::Terminal` if the modes cannot be left.
    pub fn suspend(&mut self) -> Result<(), ViewportError> {
        if !self.active {
            return Ok(());
        }
        leave_modes()?;
        self.active = false;
        debug!("terminal session suspended");
        Ok(())
    }

    /// Re-enter raw mode and the alternate screen after [`suspend`].
    ///
    /// The caller must repaint everything afterwards
    /// ([`Viewport::redraw`]).
    ///
    /// [`suspend`]: TerminalSession::suspend
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::Terminal` if the modes cannot be entered.
    pub fn resume(&mut self) -> Result<(), ViewportError> {
        if self.active {
            return Ok(());
        }
        enter_modes()?;
        self.active = true;
        debug!("terminal session resumed");
        Ok(())
    }

    /// Whether the terminal is currently in viewport mode.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(id) = self.sigwinch.take() {
            signal_hook::low_level::unregister(id);
        }
        if self.active {
            if let Err(e) = leave_modes() {
                warn!(error = %e, "failed to restore terminal");
            }
        }
    }
}

/// Set up the real terminal and a viewport drawing on stdout.
///
/// # Errors
///
/// Returns `ViewportError::Init` if the terminal cannot be configured or its
/// size cannot be read.
pub fn init() -> Result<(TerminalSession, Viewport<CrosstermBackend<Stdout>>), ViewportError> {
    let viewport = Viewport::new(CrosstermBackend::new(io::stdout()))?;
    let session = TerminalSession::start(viewport.resize_flag())?;
    Ok((session, viewport))
}

fn enter_modes() -> io::Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    Ok(())
}

fn leave_modes() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    stdout.execute(Show)?;
    Ok(())
}
