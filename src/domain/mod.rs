pub mod catalog;
pub mod errors;
pub mod export;
pub mod identity;
pub mod mock;
pub mod models;
pub mod query;
pub mod validation;
pub mod volunteer;

pub use errors::*;
pub use export::*;
pub use models::*;
pub use query::*;
pub use volunteer::*;
