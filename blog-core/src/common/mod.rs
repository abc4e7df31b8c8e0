pub mod error;

pub use error::{BlogError, Entity, Result};
