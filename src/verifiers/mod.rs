pub mod base;
pub mod firebase_verifier;
pub mod plain_verifier;

// Re-export from base.rs so we can do "use crate::verifiers::*;"
pub use base::*;
