mod engine;
mod error;

pub use engine::{Engine, PlayerLayout, Session};
pub use error::{CoreError, CoreErrorCode};
