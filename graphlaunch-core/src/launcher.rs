//! The launcher state machine and its two I/O seams.
//!
//! A run moves through a fixed sequence of states:
//! `Start -> EnvironmentSet -> ChildRunning -> ChildExited -> Paused -> Terminated`.
//! There is no branching on the child's result. A non-zero exit, a signal,
//! or a missing interpreter are all reported and then followed by the
//! pause, so the user always gets to read the console before it closes.

use crate::error::redact_connection_uri;
use crate::plan::LaunchPlan;
use crate::{LaunchError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// Prompt printed before waiting for acknowledgment.
pub const PAUSE_PROMPT: &str = "Press Enter to continue . . . ";

/// States a launch passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    /// Nothing prepared yet
    Start,
    /// Assignments prepared for the child command
    EnvironmentSet,
    /// The loader has been started and is being waited on
    ChildRunning,
    /// The loader is gone, for whatever reason
    ChildExited,
    /// The user acknowledged the finished run
    Paused,
    /// The run is over
    Terminated,
}

/// How the child process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildOutcome {
    /// The child ran and exited; `None` when it was terminated by a signal
    Exited(Option<i32>),
    /// The interpreter could not be started
    SpawnFailed(String),
}

impl ChildOutcome {
    /// Exit code the launcher itself should report.
    ///
    /// The child's code is propagated when it fits in a process exit code;
    /// signals, out-of-range codes and spawn failures map to `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exited(Some(code)) => u8::try_from(*code).unwrap_or(1),
            Self::Exited(None) | Self::SpawnFailed(_) => 1,
        }
    }
}

/// Result of a complete launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// How the child ended
    pub child: ChildOutcome,
    /// States visited, in order
    pub transitions: Vec<LaunchState>,
}

/// Runs the child process described by a plan and waits for it.
#[async_trait]
pub trait ProcessRunner: Send {
    /// Spawns the child, waits for it to exit, and reports how it ended.
    ///
    /// Failing to spawn is an outcome, not an error.
    async fn run(&mut self, plan: &LaunchPlan) -> ChildOutcome;
}

/// Blocks until the user acknowledges the finished run.
#[async_trait]
pub trait Acknowledge: Send {
    /// Waits for the user.
    ///
    /// # Errors
    /// Returns an I/O error if the console cannot be written or read
    async fn wait_for_user(&mut self) -> Result<()>;
}

/// Runs the plan with `tokio::process`, inheriting stdio, working directory
/// and the parent environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&mut self, plan: &LaunchPlan) -> ChildOutcome {
        let mut command = tokio::process::Command::new(plan.interpreter());
        command
            .args(plan.arguments())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        for assignment in plan.environment() {
            command.env(assignment.name, assignment.value());
        }

        match command.status().await {
            Ok(status) => ChildOutcome::Exited(status.code()),
            Err(e) => ChildOutcome::SpawnFailed(e.to_string()),
        }
    }
}

/// Prints [`PAUSE_PROMPT`] and reads one line.
///
/// The line is read as raw bytes, so any input counts, and end of input
/// counts as acknowledgment, so a closed stdin never hangs the launcher.
pub struct ConsolePause<R, W> {
    reader: R,
    writer: W,
}

impl ConsolePause<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Pause on the process's own stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsolePause<R, W> {
    /// Pause on an arbitrary reader/writer pair.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the pause and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> Acknowledge for ConsolePause<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn wait_for_user(&mut self) -> Result<()> {
        self.writer
            .write_all(PAUSE_PROMPT.as_bytes())
            .await
            .map_err(|e| LaunchError::io("Failed to write pause prompt", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| LaunchError::io("Failed to flush pause prompt", e))?;

        let mut line = Vec::new();
        self.reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| LaunchError::io("Failed to read acknowledgment", e))?;
        Ok(())
    }
}

/// Drives one launch: environment, child, pause.
pub struct Launcher<P, A> {
    plan: LaunchPlan,
    runner: P,
    acknowledge: A,
}

impl Launcher<TokioProcessRunner, ConsolePause<BufReader<tokio::io::Stdin>, tokio::io::Stdout>> {
    /// Launcher wired to a real child process and the console.
    pub fn console(plan: LaunchPlan) -> Self {
        Self::new(plan, TokioProcessRunner, ConsolePause::stdio())
    }
}

impl<P, A> Launcher<P, A>
where
    P: ProcessRunner,
    A: Acknowledge,
{
    /// Creates a launcher from its parts.
    pub fn new(plan: LaunchPlan, runner: P, acknowledge: A) -> Self {
        Self {
            plan,
            runner,
            acknowledge,
        }
    }

    /// Runs the child once and then pauses if the plan asks for it.
    ///
    /// The child's failure is reported through [`Outcome::child`]. A console
    /// error during the pause is logged and never replaces that outcome.
    pub async fn run(&mut self) -> Outcome {
        let mut transitions = vec![LaunchState::Start];

        for assignment in self.plan.environment() {
            debug!("Setting {:?}", assignment);
        }
        if let Some(uri) = self
            .plan
            .environment()
            .iter()
            .find(|a| a.name == crate::config::ENV_NEO4J_URI)
        {
            info!("Target: {}", redact_connection_uri(uri.value()));
        }
        enter(&mut transitions, LaunchState::EnvironmentSet);

        info!(
            "Running {} {}",
            self.plan.interpreter().display(),
            self.plan
                .arguments()
                .first()
                .map(|script| script.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        enter(&mut transitions, LaunchState::ChildRunning);
        let child = self.runner.run(&self.plan).await;
        enter(&mut transitions, LaunchState::ChildExited);

        match &child {
            ChildOutcome::Exited(Some(0)) => info!("Loader finished successfully"),
            ChildOutcome::Exited(Some(code)) => warn!("Loader exited with status {}", code),
            ChildOutcome::Exited(None) => warn!("Loader was terminated by a signal"),
            ChildOutcome::SpawnFailed(message) => error!(
                "Failed to start {}: {}",
                self.plan.interpreter().display(),
                message
            ),
        }

        if self.plan.pause() {
            match self.acknowledge.wait_for_user().await {
                Ok(()) => enter(&mut transitions, LaunchState::Paused),
                Err(e) => error!("{}", e),
            }
        } else {
            debug!("Pause disabled");
        }

        enter(&mut transitions, LaunchState::Terminated);
        Outcome { child, transitions }
    }
}

fn enter(transitions: &mut Vec<LaunchState>, state: LaunchState) {
    debug!("State -> {:?}", state);
    transitions.push(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_NEO4J_PASSWORD, DEFAULT_NEO4J_URI, LaunchConfig};
    use std::sync::{Arc, Mutex};

    /// Shared event log so the ordering between child and pause is visible.
    type Events = Arc<Mutex<Vec<String>>>;

    struct RecordingRunner {
        events: Events,
        result: ChildOutcome,
        seen: Vec<LaunchPlan>,
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(&mut self, plan: &LaunchPlan) -> ChildOutcome {
            self.events.lock().unwrap().push("child".to_string());
            self.seen.push(plan.clone());
            self.result.clone()
        }
    }

    struct RecordingPause {
        events: Events,
    }

    #[async_trait]
    impl Acknowledge for RecordingPause {
        async fn wait_for_user(&mut self) -> Result<()> {
            self.events.lock().unwrap().push("pause".to_string());
            Ok(())
        }
    }

    fn launcher(
        config: &LaunchConfig,
        result: ChildOutcome,
    ) -> (Launcher<RecordingRunner, RecordingPause>, Events) {
        let events: Events = Arc::default();
        let launcher = Launcher::new(
            LaunchPlan::from_config(config),
            RecordingRunner {
                events: Arc::clone(&events),
                result,
                seen: Vec::new(),
            },
            RecordingPause {
                events: Arc::clone(&events),
            },
        );
        (launcher, events)
    }

    #[tokio::test]
    async fn test_full_state_sequence() {
        let (mut launcher, events) = launcher(&LaunchConfig::default(), ChildOutcome::Exited(Some(0)));
        let outcome = launcher.run().await;

        assert_eq!(
            outcome.transitions,
            vec![
                LaunchState::Start,
                LaunchState::EnvironmentSet,
                LaunchState::ChildRunning,
                LaunchState::ChildExited,
                LaunchState::Paused,
                LaunchState::Terminated,
            ]
        );
        assert_eq!(outcome.child, ChildOutcome::Exited(Some(0)));
        assert_eq!(*events.lock().unwrap(), vec!["child", "pause"]);
    }

    #[tokio::test]
    async fn test_pause_after_child_failure() {
        let (mut launcher, events) = launcher(&LaunchConfig::default(), ChildOutcome::Exited(Some(2)));
        let outcome = launcher.run().await;

        assert_eq!(outcome.child.exit_code(), 2);
        assert_eq!(*events.lock().unwrap(), vec!["child", "pause"]);
    }

    #[tokio::test]
    async fn test_pause_after_spawn_failure() {
        let (mut launcher, events) = launcher(
            &LaunchConfig::default(),
            ChildOutcome::SpawnFailed("No such file or directory".to_string()),
        );
        let outcome = launcher.run().await;

        assert_eq!(outcome.child.exit_code(), 1);
        assert!(outcome.transitions.contains(&LaunchState::Paused));
        assert_eq!(*events.lock().unwrap(), vec!["child", "pause"]);
    }

    #[tokio::test]
    async fn test_no_pause_skips_acknowledgment() {
        let config = LaunchConfig::default().with_pause(false);
        let (mut launcher, events) = launcher(&config, ChildOutcome::Exited(Some(0)));
        let outcome = launcher.run().await;

        assert!(!outcome.transitions.contains(&LaunchState::Paused));
        assert_eq!(outcome.transitions.last(), Some(&LaunchState::Terminated));
        assert_eq!(*events.lock().unwrap(), vec!["child"]);
    }

    #[tokio::test]
    async fn test_runner_receives_exact_plan() {
        let (mut launcher, _events) = launcher(&LaunchConfig::default(), ChildOutcome::Exited(Some(0)));
        launcher.run().await;
        launcher.run().await;

        let seen = &launcher.runner.seen;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);

        let env = seen[0].environment();
        assert_eq!(env[0].value(), DEFAULT_NEO4J_URI);
        assert_eq!(env[2].value(), DEFAULT_NEO4J_PASSWORD);
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ChildOutcome::Exited(Some(0)).exit_code(), 0);
        assert_eq!(ChildOutcome::Exited(Some(3)).exit_code(), 3);
        assert_eq!(ChildOutcome::Exited(Some(-1)).exit_code(), 1);
        assert_eq!(ChildOutcome::Exited(Some(9009)).exit_code(), 1);
        assert_eq!(ChildOutcome::Exited(None).exit_code(), 1);
        assert_eq!(ChildOutcome::SpawnFailed(String::new()).exit_code(), 1);
    }

    #[tokio::test]
    async fn test_console_pause_prints_prompt_and_reads_line() {
        let input: &[u8] = b"\nleftover\n";
        let mut pause = ConsolePause::new(input, Vec::new());
        pause.wait_for_user().await.unwrap();

        assert_eq!(pause.into_writer(), PAUSE_PROMPT.as_bytes());
    }

    #[tokio::test]
    async fn test_non_utf8_acknowledgment_keeps_child_exit_code() {
        let events: Events = Arc::default();
        let mut launcher = Launcher::new(
            LaunchPlan::from_config(&LaunchConfig::default()),
            RecordingRunner {
                events: Arc::clone(&events),
                result: ChildOutcome::Exited(Some(7)),
                seen: Vec::new(),
            },
            ConsolePause::new(&b"\xe9\n"[..], Vec::new()),
        );

        let outcome = launcher.run().await;

        assert_eq!(outcome.child.exit_code(), 7);
        assert!(outcome.transitions.contains(&LaunchState::Paused));
    }

    struct BrokenConsole;

    #[async_trait]
    impl Acknowledge for BrokenConsole {
        async fn wait_for_user(&mut self) -> Result<()> {
            Err(LaunchError::io(
                "Failed to read acknowledgment",
                std::io::Error::other("console closed"),
            ))
        }
    }

    #[tokio::test]
    async fn test_console_error_does_not_replace_child_outcome() {
        let events: Events = Arc::default();
        let mut launcher = Launcher::new(
            LaunchPlan::from_config(&LaunchConfig::default()),
            RecordingRunner {
                events: Arc::clone(&events),
                result: ChildOutcome::Exited(Some(4)),
                seen: Vec::new(),
            },
            BrokenConsole,
        );

        let outcome = launcher.run().await;

        assert_eq!(outcome.child, ChildOutcome::Exited(Some(4)));
        assert!(!outcome.transitions.contains(&LaunchState::Paused));
        assert_eq!(outcome.transitions.last(), Some(&LaunchState::Terminated));
    }

    #[tokio::test]
    async fn test_console_pause_returns_on_eof() {
        let input: &[u8] = b"";
        let mut pause = ConsolePause::new(input, Vec::new());
        assert!(pause.wait_for_user().await.is_ok());
    }
}
