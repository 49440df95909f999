pub mod error;

pub use error::{auth_error_response, validation_error_response, Language};
