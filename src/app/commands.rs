//! Parsing of `:` command line input.

use crate::model::{ColorPair, ColorRole};
use thiserror::Error;

/// A parsed command line instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `q`, `quit`
    Quit,
    /// `<number>`: select a 1-based line.
    GoTo(usize),
    /// `pager` / `continuous`
    PagerMode(bool),
    /// `follow` / `nofollow`
    Follow(bool),
    /// `top <text>` sets the top bar text, bare `top` clears and hides it.
    TopBar(Option<String>),
    /// `bottom <text>` / `bottom`, as for `top`.
    BottomBar(Option<String>),
    /// `!<shell command>`: run in the foreground.
    Shell(String),
    /// `color <role> <fg> <bg>`
    Color {
        /// Screen region being recolored.
        role: ColorRole,
        /// New foreground and background.
        pair: ColorPair,
    },
}

/// Why a command line could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing but whitespace was entered.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Line numbers start at 1.
    #[error("invalid line number: {0}")]
    InvalidLine(String),

    /// `!` with nothing after it.
    #[error("missing shell command after '!'")]
    MissingShellCommand,

    /// `color` named a role that does not exist.
    #[error("unknown color role: {0} (top, bottom, command, selected, normal)")]
    UnknownRole(String),

    /// `color` without exactly three arguments.
    #[error("usage: color <role> <fg> <bg>")]
    ColorUsage,
}

/// Parse the text committed on the command line.
///
/// # Errors
///
/// Returns `CommandError` describing what is wrong with `input`.
pub fn parse(input: &str) -> Result<Command, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandError::Empty);
    }

    if let Some(shell) = input.strip_prefix('!') {
        let shell = shell.trim();
        if shell.is_empty() {
            return Err(CommandError::MissingShellCommand);
        }
        return Ok(Command::Shell(shell.to_string()));
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return match input.parse::<usize>() {
            Ok(line) if line > 0 => Ok(Command::GoTo(line)),
            _ => Err(CommandError::InvalidLine(input.to_string())),
        };
    }

    let (name, rest) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (input, ""),
    };
    let text = (!rest.is_empty()).then(|| rest.to_string());

    match name {
        "q" | "quit" if rest.is_empty() => Ok(Command::Quit),
        "pager" if rest.is_empty() => Ok(Command::PagerMode(true)),
        "continuous" if rest.is_empty() => Ok(Command::PagerMode(false)),
        "follow" if rest.is_empty() => Ok(Command::Follow(true)),
        "nofollow" if rest.is_empty() => Ok(Command::Follow(false)),
        "top" => Ok(Command::TopBar(text)),
        "bottom" => Ok(Command::BottomBar(text)),
        "color" => parse_color(rest),
        _ => Err(CommandError::Unknown(input.to_string())),
    }
}

fn parse_color(args: &str) -> Result<Command, CommandError> {
    let mut words = args.split_whitespace();
    let (Some(role), Some(fg), Some(bg), None) = (words.next(), words.next(), words.next(), words.next())
    else {
        return Err(CommandError::ColorUsage);
    };
    let role = ColorRole::from_name(role).ok_or_else(|| CommandError::UnknownRole(role.to_string()))?;
    Ok(Command::Color {
        role,
        pair: ColorPair::from_names(fg, bg),
    })
}
