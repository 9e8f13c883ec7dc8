//! Configuration: TOML file, environment and CLI precedence, key bindings.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{CliOverrides, ConfigError, ConfigFile, ResolvedConfig};
