// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod controller;
pub mod logging;
pub mod types;

pub use controller::*;
pub use logging::*;
pub use types::*;
