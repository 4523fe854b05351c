//! Assembly of the child invocation from a [`LaunchConfig`].
//!
//! A plan is pure data: the interpreter, the ordered environment
//! assignments, and the ordered argument vector. Building it performs no
//! I/O, so two plans built from the same configuration are equal.

use crate::config::{
    ENV_NEO4J_PASSWORD, ENV_NEO4J_URI, ENV_NEO4J_USER, FLAG_MAS_PERSONNEL_CSV,
    FLAG_NEO4J_EXPORT, FLAG_WIKIDATA_JSON, LaunchConfig,
};
use crate::error::redact_connection_uri;
use crate::security::REDACTED;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// One environment assignment applied to the child.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    /// Variable name
    pub name: &'static str,
    value: Zeroizing<String>,
    secret: bool,
}

impl EnvAssignment {
    fn plain(name: &'static str, value: &str) -> Self {
        Self {
            name,
            value: Zeroizing::new(value.to_string()),
            secret: false,
        }
    }

    fn secret(name: &'static str, value: &str) -> Self {
        Self {
            name,
            value: Zeroizing::new(value.to_string()),
            secret: true,
        }
    }

    /// The exact value handed to the child.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn display_value(&self) -> String {
        if self.secret {
            REDACTED.to_string()
        } else if self.name == ENV_NEO4J_URI {
            redact_connection_uri(&self.value)
        } else {
            self.value.to_string()
        }
    }
}

impl std::fmt::Debug for EnvAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.display_value())
    }
}

/// The fully assembled child invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    interpreter: PathBuf,
    environment: Vec<EnvAssignment>,
    arguments: Vec<OsString>,
    pause: bool,
}

impl LaunchPlan {
    /// Builds the plan for `config`.
    ///
    /// The environment is always `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`
    /// in that order. The argument vector starts with the script, then the
    /// three flag/value pairs in fixed order, then any extra arguments.
    /// Paths are carried as `OsString`s and are never quoted or rewritten.
    ///
    /// # Example
    /// ```rust
    /// use graphlaunch_core::{LaunchConfig, LaunchPlan};
    ///
    /// let plan = LaunchPlan::from_config(&LaunchConfig::default());
    /// assert_eq!(plan.environment().len(), 3);
    /// assert_eq!(plan.arguments().len(), 7);
    /// ```
    pub fn from_config(config: &LaunchConfig) -> Self {
        let credentials = &config.connection.credentials;
        let environment = vec![
            EnvAssignment::plain(ENV_NEO4J_URI, &config.connection.uri),
            EnvAssignment::plain(ENV_NEO4J_USER, credentials.username()),
            EnvAssignment::secret(ENV_NEO4J_PASSWORD, credentials.expose_password()),
        ];

        let inputs = &config.inputs;
        let mut arguments: Vec<OsString> = vec![
            config.script.clone().into_os_string(),
            FLAG_NEO4J_EXPORT.into(),
            inputs.neo4j_export.clone().into_os_string(),
            FLAG_WIKIDATA_JSON.into(),
            inputs.wikidata_json.clone().into_os_string(),
            FLAG_MAS_PERSONNEL_CSV.into(),
            inputs.mas_personnel_csv.clone().into_os_string(),
        ];
        arguments.extend(config.extra_args.iter().map(OsString::from));

        Self {
            interpreter: config.interpreter.clone(),
            environment,
            arguments,
            pause: config.pause,
        }
    }

    /// Program to execute.
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Ordered environment assignments applied on top of the inherited environment.
    pub fn environment(&self) -> &[EnvAssignment] {
        &self.environment
    }

    /// Ordered argument vector, script first.
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// Whether the launcher waits for the user after the child exits.
    pub fn pause(&self) -> bool {
        self.pause
    }

    /// A view of the plan that is safe to print or log.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            interpreter: self.interpreter.to_string_lossy().into_owned(),
            environment: self
                .environment
                .iter()
                .map(|assignment| (assignment.name.to_string(), assignment.display_value()))
                .collect(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            pause: self.pause,
        }
    }
}

/// Redacted, serializable description of a [`LaunchPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Program to execute
    pub interpreter: String,
    /// Environment assignments with secrets masked
    pub environment: Vec<(String, String)>,
    /// Argument vector, script first
    pub arguments: Vec<String>,
    /// Whether the launcher pauses after the child exits
    pub pause: bool,
}

impl PlanSummary {
    /// Renders the summary as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a serialization error if the summary cannot be encoded
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::LaunchError::serialization("launch plan summary", e))
    }
}
