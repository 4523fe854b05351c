//! Command line surface of graphlaunch.
//!
//! Exposed as a library so the argument mapping can be tested without
//! spawning anything. The binary entry point is in main.rs.

use clap::{Args, Parser};
use graphlaunch_core::config::{
    DEFAULT_INTERPRETER, DEFAULT_MAS_PERSONNEL_CSV, DEFAULT_NEO4J_EXPORT, DEFAULT_NEO4J_PASSWORD,
    DEFAULT_NEO4J_URI, DEFAULT_NEO4J_USER, DEFAULT_SCRIPT, DEFAULT_WIKIDATA_JSON,
};
use graphlaunch_core::{ConnectionSettings, Credentials, DataInputs, LaunchConfig, LaunchError};
use std::env;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Environment variable that overrides the built-in password.
pub const PASSWORD_ENV: &str = "GRAPHLAUNCH_NEO4J_PASSWORD";

/// CLI argument structure.
///
/// With no arguments at all every value comes from the built-in defaults
/// and the launcher pauses at the end.
#[derive(Debug, Parser)]
#[command(name = "graphlaunch")]
#[command(about = "Run the graph loading script with its connection settings and data files")]
#[command(version)]
#[command(long_about = "
graphlaunch - run the graph loader and keep its output on screen

Sets NEO4J_URI, NEO4J_USER and NEO4J_PASSWORD for the child process, runs

  <interpreter> <script> --neo4j_export <file> --wikidata_json <file> --mas_personnel_csv <file>

in the current directory, waits for it to exit, then waits for Enter.

Every value has a built-in default and can be overridden by a flag or a
GRAPHLAUNCH_* environment variable. The password is never accepted as a flag:
use GRAPHLAUNCH_NEO4J_PASSWORD or --prompt-password.

EXAMPLES:
  graphlaunch
  graphlaunch --prompt-password --no-pause
  graphlaunch --script load_graph_v_5.py -- --dry-run --limit 5
  graphlaunch --print-plan
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Interpreter that runs the loader
    #[arg(long, env = "GRAPHLAUNCH_INTERPRETER", default_value = DEFAULT_INTERPRETER)]
    pub interpreter: PathBuf,

    /// Loader script
    #[arg(long, env = "GRAPHLAUNCH_SCRIPT", default_value = DEFAULT_SCRIPT)]
    pub script: PathBuf,

    /// Graph database URI
    #[arg(
        long,
        env = "GRAPHLAUNCH_NEO4J_URI",
        default_value = DEFAULT_NEO4J_URI,
        help = "Graph database URI (credentials in it are redacted in logs)"
    )]
    pub uri: String,

    /// Graph database username
    #[arg(long, env = "GRAPHLAUNCH_NEO4J_USER", default_value = DEFAULT_NEO4J_USER)]
    pub user: String,

    /// Ask for the password instead of using the configured one
    #[arg(long, help = "Prompt for the graph database password (input is not echoed)")]
    pub prompt_password: bool,

    /// Exported query-result file
    #[arg(long, env = "GRAPHLAUNCH_NEO4J_EXPORT", default_value = DEFAULT_NEO4J_EXPORT)]
    pub neo4j_export: PathBuf,

    /// Wikidata JSON file
    #[arg(long, env = "GRAPHLAUNCH_WIKIDATA_JSON", default_value = DEFAULT_WIKIDATA_JSON)]
    pub wikidata_json: PathBuf,

    /// Merged personnel CSV
    #[arg(
        long,
        env = "GRAPHLAUNCH_MAS_PERSONNEL_CSV",
        default_value = DEFAULT_MAS_PERSONNEL_CSV
    )]
    pub mas_personnel_csv: PathBuf,

    /// Skip the final pause
    #[arg(long, env = "GRAPHLAUNCH_NO_PAUSE", help = "Exit as soon as the loader finishes")]
    pub no_pause: bool,

    /// Print the launch plan and exit
    #[arg(long, help = "Print the launch plan as JSON (password masked) without running it")]
    pub print_plan: bool,

    /// Arguments passed to the loader after the fixed file pairs
    #[arg(last = true, value_name = "LOADER_ARGS")]
    pub extra: Vec<String>,
}

/// Logging flags.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

/// Where the password handed to the loader came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// The built-in placeholder
    Default,
    /// `GRAPHLAUNCH_NEO4J_PASSWORD`
    Environment,
    /// Interactive prompt
    Prompt,
}

/// Resolves the password without ever logging it.
///
/// The prompt wins when requested; otherwise a non-empty
/// `GRAPHLAUNCH_NEO4J_PASSWORD` is used, and the built-in value last.
///
/// # Errors
/// Returns an error if the interactive prompt cannot read from the terminal
pub fn resolve_password(
    prompt: bool,
) -> graphlaunch_core::Result<(Zeroizing<String>, PasswordSource)> {
    if prompt {
        let password = rpassword::prompt_password("Neo4j password: ")
            .map_err(|e| LaunchError::io("Failed to read password", e))?;
        return Ok((Zeroizing::new(password), PasswordSource::Prompt));
    }

    if let Ok(password) = env::var(PASSWORD_ENV)
        && !password.is_empty()
    {
        return Ok((Zeroizing::new(password), PasswordSource::Environment));
    }

    Ok((
        Zeroizing::new(DEFAULT_NEO4J_PASSWORD.to_string()),
        PasswordSource::Default,
    ))
}

impl Cli {
    /// Builds the launch configuration from the parsed arguments.
    pub fn to_config(&self, password: &str) -> LaunchConfig {
        LaunchConfig::default()
            .with_interpreter(self.interpreter.clone())
            .with_script(self.script.clone())
            .with_connection(ConnectionSettings {
                uri: self.uri.clone(),
                credentials: Credentials::new(self.user.clone(), password.to_string()),
            })
            .with_inputs(DataInputs {
                neo4j_export: self.neo4j_export.clone(),
                wikidata_json: self.wikidata_json.clone(),
                mas_personnel_csv: self.mas_personnel_csv.clone(),
            })
            .with_extra_args(self.extra.clone())
            .with_pause(!self.no_pause)
    }
}
