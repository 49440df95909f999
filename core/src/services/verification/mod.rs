//! One-time code issuing.

mod code_generator;
mod issuer;


pub use code_generator::{normalize_code_length, CodeGenerator, CodePattern};
pub use issuer::CodeIssuer;
