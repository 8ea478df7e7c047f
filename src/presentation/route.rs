/// Destinations of the sign-in navigation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Start destination: the login screen.
    Auth,
    Success { user_name: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Auth => "auth".to_string(),
            Route::Success { user_name } => format!("success/{}", user_name),
        }
    }
}
