//! pipeview
//!
//! Watch a command's output (or piped stdin) in a scrollable terminal
//! viewport with status bars and a `:` command line.
//!
//! The [`viewport`] module is the reusable core: a line window over any
//! [`source::LineSource`], with dirty-region repainting on a ratatui
//! backend. [`app`] wires it to a live input source and the keyboard.

pub mod app;
pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod template;
pub mod viewport;

#[cfg(test)]
mod test_harness;
