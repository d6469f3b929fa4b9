pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::{GenerateError, JsonExtractError};
pub use gemini::Gemini;
pub use traits::TextGenerator;
