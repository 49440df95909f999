//! HTTP surface of the WedLedger authentication core.
//!
//! Exposes the login flow (send code, verify code, logout, check) and the
//! `AuthenticatedPhone` guard used by dashboard routes.

pub mod app;
pub mod config;
pub mod delivery;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
