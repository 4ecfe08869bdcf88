//! Presentation layer handling terminal UI and user input.
//!
//! Renders each screen with ratatui and maps key presses onto [`App`]
//! operations.
//!
//! [`App`]: crate::application::App

pub mod input;
pub mod ui;

pub use input::*;
pub use ui::*;
