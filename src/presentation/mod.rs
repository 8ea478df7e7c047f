//! Presentation-side contract of the sign-in flow.
//!
//! The screen owns credential acquisition, subscribes to the controller's state and
//! turns it into one-shot UI effects (navigation, transient notices, dialogs).

pub mod acquisition;
pub mod route;
pub mod screen;

pub use acquisition::{AcquisitionError, Connectivity, CredentialSource};
pub use route::Route;
pub use screen::{AuthScreen, ScreenView, UiEffect};
