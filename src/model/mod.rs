//! Domain model types (pure).
//!
//! All types in this module are pure data with no terminal or I/O access.

pub mod colors;
pub mod error;
pub mod key_action;
pub mod position;

// Re-export for convenience
pub use colors::{ColorAssignment, ColorPair, ColorRole};
pub use error::{AppError, InputError, ViewportError};
pub use key_action::KeyAction;
pub use position::VirtualPosition;
