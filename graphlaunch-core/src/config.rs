//! Launch configuration and its built-in defaults.
//!
//! `LaunchConfig::default()` reproduces the fixed launcher exactly: the same
//! three connection values, the same interpreter and script, and the same
//! three data files. Every field can be overridden from the command line,
//! but nothing here is validated; the loader script is the one that decides
//! whether a URI or a path is usable.

use crate::security::Credentials;
use std::path::PathBuf;

/// Environment variable carrying the graph database URI.
pub const ENV_NEO4J_URI: &str = "NEO4J_URI";
/// Environment variable carrying the graph database username.
pub const ENV_NEO4J_USER: &str = "NEO4J_USER";
/// Environment variable carrying the graph database password.
pub const ENV_NEO4J_PASSWORD: &str = "NEO4J_PASSWORD";

/// Flag naming the exported query-result file.
pub const FLAG_NEO4J_EXPORT: &str = "--neo4j_export";
/// Flag naming the Wikidata JSON file.
pub const FLAG_WIKIDATA_JSON: &str = "--wikidata_json";
/// Flag naming the merged personnel CSV.
pub const FLAG_MAS_PERSONNEL_CSV: &str = "--mas_personnel_csv";

/// Program that runs the loader script.
pub const DEFAULT_INTERPRETER: &str = "python";
/// Loader script, relative to the working directory.
pub const DEFAULT_SCRIPT: &str = "load_graph.py";

/// Graph database URI.
pub const DEFAULT_NEO4J_URI: &str = "neo4j+s://d8d4e86b.databases.neo4j.io";
/// Graph database username.
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
/// Placeholder only. Real deployments supply the password through
/// `GRAPHLAUNCH_NEO4J_PASSWORD` or the interactive prompt.
pub const DEFAULT_NEO4J_PASSWORD: &str = "change-me";

/// Exported query-result file.
pub const DEFAULT_NEO4J_EXPORT: &str = "SGX Annual Reports/Case Study/Venture Corporation Limited/neo4j_query_table_data_2025-6-26.json";
/// Simplified Wikidata dump.
pub const DEFAULT_WIKIDATA_JSON: &str = "WikiData/data.json";
/// Merged personnel table.
pub const DEFAULT_MAS_PERSONNEL_CSV: &str = "MAS/MAS_Personnel_merged.csv";

/// Connection values forwarded to the loader through its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Graph database URI (may carry userinfo, which is redacted in logs)
    pub uri: String,
    /// Username and password
    pub credentials: Credentials,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_NEO4J_URI.to_string(),
            credentials: Credentials::new(
                DEFAULT_NEO4J_USER.to_string(),
                DEFAULT_NEO4J_PASSWORD.to_string(),
            ),
        }
    }
}

/// The three data files handed to the loader, in the order it receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataInputs {
    /// Exported query-result file (JSON)
    pub neo4j_export: PathBuf,
    /// Simplified Wikidata dump (JSON)
    pub wikidata_json: PathBuf,
    /// Merged personnel table (CSV)
    pub mas_personnel_csv: PathBuf,
}

impl Default for DataInputs {
    fn default() -> Self {
        Self {
            neo4j_export: PathBuf::from(DEFAULT_NEO4J_EXPORT),
            wikidata_json: PathBuf::from(DEFAULT_WIKIDATA_JSON),
            mas_personnel_csv: PathBuf::from(DEFAULT_MAS_PERSONNEL_CSV),
        }
    }
}

/// Everything needed to build a [`crate::launcher::LaunchPlan`].
///
/// # Example
/// ```rust
/// use graphlaunch_core::config::{LaunchConfig, DEFAULT_SCRIPT};
///
/// let config = LaunchConfig::default()
///     .with_extra_args(vec!["--dry-run".to_string()])
///     .with_pause(false);
///
/// assert_eq!(config.script.to_str(), Some(DEFAULT_SCRIPT));
/// assert_eq!(config.extra_args, vec!["--dry-run".to_string()]);
/// assert!(!config.pause);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Program that runs the loader script
    pub interpreter: PathBuf,
    /// Loader script, resolved against the working directory
    pub script: PathBuf,
    /// Values exported to the child environment
    pub connection: ConnectionSettings,
    /// Data files passed as flag/value pairs
    pub inputs: DataInputs,
    /// Arguments appended after the three fixed pairs
    pub extra_args: Vec<String>,
    /// Whether to wait for the user after the child exits
    pub pause: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            script: PathBuf::from(DEFAULT_SCRIPT),
            connection: ConnectionSettings::default(),
            inputs: DataInputs::default(),
            extra_args: Vec::new(),
            pause: true,
        }
    }
}

impl LaunchConfig {
    /// Sets the interpreter.
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Sets the loader script.
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }

    /// Replaces the connection settings.
    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Replaces the data file paths.
    pub fn with_inputs(mut self, inputs: DataInputs) -> Self {
        self.inputs = inputs;
        self
    }

    /// Sets the arguments forwarded after the fixed pairs.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Enables or disables the post-run pause.
    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }
}
