//! SlideGrid Application
//!
//! Headless editor shell: loads configuration, replays editing sessions
//! and writes PDF exports.

pub mod cli;
pub mod session;
mod shortcuts;

pub use cli::Cli;
pub use session::{Script, Session, SessionError};
pub use shortcuts::{Shortcut, ShortcutRegistry};
