//! Authentication

mod flow;
mod manager;
mod password;
mod token;

pub use flow::AuthFlow;
pub use manager::CredentialManager;
pub use password::PasswordFlow;
pub use token::AccessToken;
