use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShoefinderError {
    #[error("Configuration error: {0}")]
    Config(String),
}
