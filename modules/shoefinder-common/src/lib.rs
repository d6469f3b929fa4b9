pub mod catalog;
pub mod config;
pub mod error;
pub mod intent;

pub use catalog::*;
pub use config::Config;
pub use error::ShoefinderError;
pub use intent::*;
