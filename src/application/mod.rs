//! Application layer managing state and business workflows.
//!
//! The [`Store`] is the single authoritative container for recruitment data.
//! The registration wizard and the terminal [`App`] drive it through actions.

pub mod notice;
pub mod registration;
pub mod state;
pub mod store;

pub use notice::*;
pub use registration::*;
pub use state::*;
pub use store::*;
