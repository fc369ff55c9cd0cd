//! The logic side of clone-org: one event loop that owns the [`Model`],
//! feeds every message through [`update`] and executes the resulting
//! commands. Renderers only ever see snapshots.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actors::{self, ActorHandle, InputActor, SignalActor, TickActor};
use crate::clone::{CloneExecutor, CloneOrchestrator, ConcurrencyLimiter};
use crate::destination;
use crate::github::RepositoryDirectory;
use crate::render::{RenderState, StateSender};
use crate::tea::{update, Command, Message, Model};
use crate::Result;

/// What to clone and where.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub org: String,
    pub token: String,
    pub destination: PathBuf,
    /// A TUI renders the run and reads the keyboard.
    pub interactive: bool,
}

pub struct App<D, E> {
    params: RunParams,
    directory: Arc<D>,
    executor: Arc<E>,
    limiter: ConcurrencyLimiter,
    msg_tx: mpsc::UnboundedSender<Message>,
    msg_rx: mpsc::UnboundedReceiver<Message>,
    tick_interval: Option<Duration>,
    terminal_input: bool,
    signals: bool,
}

impl<D, E> App<D, E>
where
    D: RepositoryDirectory,
    E: CloneExecutor,
{
    pub fn new(params: RunParams, directory: D, executor: E, limiter: ConcurrencyLimiter) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let terminal_input = params.interactive;
        Self {
            params,
            directory: Arc::new(directory),
            executor: Arc::new(executor),
            limiter,
            msg_tx,
            msg_rx,
            tick_interval: Some(Duration::from_millis(100)),
            terminal_input,
            signals: true,
        }
    }

    /// Run without reading the terminal, OS signals or spinner ticks. Every
    /// input then has to come through [`App::messages`].
    pub fn detached(mut self) -> Self {
        self.terminal_input = false;
        self.signals = false;
        self.tick_interval = None;
        self
    }

    /// Sender for injecting messages, e.g. an interrupt from the render thread.
    pub fn messages(&self) -> mpsc::UnboundedSender<Message> {
        self.msg_tx.clone()
    }

    /// Drive the run until the model asks to quit and return the final
    /// snapshot. Clones still in flight at that point are left to finish on
    /// their own; their results are never applied.
    pub async fn run(mut self, state_tx: StateSender) -> RenderState {
        let mut model = Model::new(
            self.params.org.clone(),
            self.params.destination.clone(),
            self.params.interactive,
        );
        let clone_cancel = CancellationToken::new();
        let actors = self.spawn_actors();

        let _ = self.msg_tx.send(Message::Start);
        state_tx.send(model.snapshot());
        model.dirty = false;

        while let Some(msg) = self.msg_rx.recv().await {
            let mut quit = false;
            for cmd in update(&mut model, msg) {
                quit |= self.execute_command(cmd, &clone_cancel);
            }

            if model.dirty {
                state_tx.send(model.snapshot());
                model.dirty = false;
            }
            if quit {
                break;
            }
        }

        actors::shutdown_all(&actors);
        clone_cancel.cancel();
        tracing::info!("run finished: {}", model.state.label());
        model.snapshot()
    }

    /// Returns true when the loop should stop.
    fn execute_command(&self, cmd: Command, clone_cancel: &CancellationToken) -> bool {
        match cmd {
            Command::ListRepos => {
                tracing::debug!("Command::ListRepos org={}", self.params.org);
                let directory = self.directory.clone();
                let org = self.params.org.clone();
                let token = self.params.token.clone();
                let dest = self.params.destination.clone();
                let tx = self.msg_tx.clone();

                tokio::spawn(async move {
                    let msg = match directory.list(&token, &org).await {
                        Err(e) => Message::LookupFailed(e.to_string()),
                        Ok(listing) => match destination::prepare_blocking(dest).await {
                            Ok(()) => Message::ReposListed(listing),
                            Err(e) => Message::DestinationFailed(e.to_string()),
                        },
                    };
                    let _ = tx.send(msg);
                });
            }

            Command::StartCloning { repos } => {
                tracing::debug!("Command::StartCloning repos={}", repos.len());
                let orchestrator = CloneOrchestrator::new(
                    self.executor.clone(),
                    self.limiter.clone(),
                    clone_cancel.clone(),
                );
                let dest = self.params.destination.clone();
                let tx = self.msg_tx.clone();

                tokio::spawn(async move {
                    let report = orchestrator.run(repos, &dest, tx).await;
                    tracing::info!(
                        "{} of {} repositories cloned",
                        report.succeeded(),
                        report.total()
                    );
                });
            }

            Command::CancelClones => {
                tracing::debug!("Command::CancelClones");
                clone_cancel.cancel();
            }

            Command::Quit => {
                tracing::debug!("Command::Quit");
                return true;
            }
        }

        false
    }

    fn spawn_actors(&self) -> Vec<ActorHandle> {
        let mut actors = Vec::new();
        if let Some(interval) = self.tick_interval {
            actors.push(
                TickActor::new(self.msg_tx.clone())
                    .with_interval(interval)
                    .spawn(),
            );
        }
        if self.signals {
            actors.push(SignalActor::new(self.msg_tx.clone()).spawn());
        }
        if self.terminal_input {
            actors.push(InputActor::new(self.msg_tx.clone()).spawn());
        }
        tracing::debug!("spawned {} actors", actors.len());
        actors
    }
}

/// Runs an [`App`] on its own tokio runtime, off the render thread.
pub struct LogicThread;

impl LogicThread {
    pub fn run<D, E>(app: App<D, E>, state_tx: StateSender) -> Result<RenderState>
    where
        D: RepositoryDirectory,
        E: CloneExecutor,
    {
        let runtime = Runtime::new()?;
        let final_state = runtime.block_on(app.run(state_tx));
        // Detached clone tasks are not waited for.
        runtime.shutdown_background();
        Ok(final_state)
    }
}
