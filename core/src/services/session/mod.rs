//! Sliding sessions for authenticated phones.

mod store;


pub use store::{generate_session_token, SessionStore};
