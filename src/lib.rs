pub mod analysis;
pub mod config;
pub mod error;
pub mod genius;
pub mod lyrics;
pub mod models;
pub mod normalize;
pub mod server;

pub use error::{Error, Result};
pub use server::{AppState, build_router};
