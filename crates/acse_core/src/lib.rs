pub mod blob;
pub mod codec;
pub mod core_api;
pub mod date;
pub mod generation;
pub mod item;
pub mod linked;
pub mod mapper;
pub mod quirks;
pub mod record;
pub mod schema;
pub mod text;
pub mod town_pass;

pub use core_api::{CoreError, CoreErrorCode};
