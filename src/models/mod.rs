pub mod auth_state;
pub mod credential;
pub mod identity;

pub use auth_state::AuthState;
pub use credential::Credential;
pub use identity::Identity;
