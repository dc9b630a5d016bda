pub mod alloc;
pub mod cell;
pub mod error;
pub mod group;
pub mod implication;
pub mod math;
pub mod rule;
pub mod session;
pub mod surface;

pub use error::{CsgError, Result};
pub use session::Session;
