//! Credential container with automatic memory zeroing.

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Placeholder shown wherever a secret would otherwise be printed.
pub const REDACTED: &str = "****";

/// Username and password for the graph database.
///
/// Both values live in `Zeroizing` containers and are cleared when the
/// struct is dropped. The `Debug` impl never prints the password.
///
/// # Example
///
/// ```rust
/// use graphlaunch_core::security::Credentials;
///
/// let creds = Credentials::new("neo4j".to_string(), "secret".to_string());
/// assert_eq!(creds.username(), "neo4j");
/// assert!(!format!("{:?}", creds).contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing.
    pub fn new(username: String, password: String) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exposes the password.
    ///
    /// The only legitimate caller is the code that hands the value to the
    /// child process environment.
    pub fn expose_password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &REDACTED)
            .finish()
    }
}
