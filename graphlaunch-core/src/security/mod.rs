//! Credential handling for the graph database connection.
//!
//! The launcher only forwards credentials to the child process; it never
//! validates, encrypts, or persists them. What this module guarantees is
//! that they stay out of logs, debug output, and serialized summaries, and
//! that the in-memory copies are wiped on drop.

mod credentials;

pub use credentials::{Credentials, REDACTED};
