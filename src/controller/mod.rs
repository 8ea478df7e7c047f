pub mod auth_controller;

pub use auth_controller::{resolve_outcome, AuthController};
