//! Infrastructure layer providing external service integrations.
//!
//! Local storage, the student directory lookup, avatar encoding and
//! command line configuration.

pub mod avatar;
pub mod config;
pub mod directory;
pub mod persistence;

pub use avatar::*;
pub use config::*;
pub use directory::*;
pub use persistence::*;
