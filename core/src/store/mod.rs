//! Per-phone authentication state with per-phone serialization.

mod phone_state;


pub use phone_state::{PhoneAuthState, PhoneStateStore};
