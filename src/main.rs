use std::io::{self, stdout, IsTerminal, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use clone_org::app::{App, LogicThread, RunParams};
use clone_org::clone::{ConcurrencyLimiter, GitCloner};
use clone_org::config::{Config, Protocol};
use clone_org::github::GithubDirectory;
use clone_org::log::LogTarget;
use clone_org::render::{RenderState, StateSender};
use clone_org::tea::Message;
use clone_org::{ui, Error, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Clone every repository of a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "clone-org")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    GITHUB_TOKEN        Token used when --token is absent\n    CLONE_ORG_DEBUG=1   Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// Organization whose repositories are cloned
    #[arg(short, long)]
    pub org: Option<String>,

    /// GitHub token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory to clone into [default: <tmp>/<org>]
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Print plain progress lines instead of the interactive UI
    #[arg(long)]
    pub no_tui: bool,

    /// Maximum number of simultaneous clones [default: 20]
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Clone over HTTPS instead of SSH
    #[arg(long)]
    pub https: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Organization and token; both are required and must not be blank.
    fn required(&self) -> Result<(String, String)> {
        let org = non_blank(&self.org)
            .ok_or_else(|| Error::Validation("missing organization (--org)".to_string()))?;
        let token = non_blank(&self.token).ok_or_else(|| {
            Error::Validation("missing token (--token or GITHUB_TOKEN)".to_string())
        })?;
        Ok((org, token))
    }

    /// Flags take precedence over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = Some(concurrency);
        }
        if self.https {
            config.protocol = Protocol::Https;
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let (org, token) = cli.required()?;
    let interactive = !cli.no_tui && stdout().is_terminal();

    let target = if interactive {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    // A TUI run without a writable log file just runs without logs.
    if let Err(e) = clone_org::log::init(target, cli.debug) {
        if !interactive {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }
    tracing::info!("clone-org starting: org={} interactive={}", org, interactive);

    let mut config = Config::load()?;
    cli.apply(&mut config);

    let destination = cli
        .destination
        .clone()
        .unwrap_or_else(|| config.default_destination(&org));
    let params = RunParams {
        org,
        token,
        destination,
        interactive,
    };
    let app = App::new(
        params,
        GithubDirectory::new(&config)?,
        GitCloner::new(),
        ConcurrencyLimiter::new(config.effective_concurrency()),
    );

    let final_state = if interactive {
        run_tui(app)?
    } else {
        run_plain(app)?
    };

    print!("{}", ui::summary(&final_state));
    Ok(final_state.state.exit_code())
}

fn run_tui(app: App<GithubDirectory, GitCloner>) -> Result<RenderState> {
    let (state_tx, state_rx) = StateSender::latest_wins();
    let messages = app.messages();

    let mut terminal = setup_terminal()?;
    let logic_handle = thread::spawn(move || LogicThread::run(app, state_tx));

    let rendered = render_loop(&mut terminal, state_rx);
    if rendered.is_err() {
        // Without a screen there is nothing to wait for.
        let _ = messages.send(Message::Interrupt);
    }

    let final_state = logic_handle
        .join()
        .map_err(|_| Error::TaskJoin("logic thread panicked".to_string()));
    restore_terminal(&mut terminal)?;
    rendered?;
    final_state?
}

fn run_plain(app: App<GithubDirectory, GitCloner>) -> Result<RenderState> {
    let (state_tx, state_rx) = StateSender::every_state();

    let printer = thread::spawn(move || {
        let mut last = String::new();
        for state in state_rx.iter() {
            // Terminal states are covered by the summary.
            if state.state.is_terminal() {
                continue;
            }
            let line = ui::status_line(&state);
            if line != last {
                println!("{}", line);
                last = line;
            }
        }
    });

    let final_state = LogicThread::run(app, state_tx);
    let _ = printer.join();
    final_state
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: Option<u64> = None;
    let mut last_frame = Instant::now();

    loop {
        match state_rx.try_recv() {
            Ok(s) => state = s,
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if last_version != Some(state.version) {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = Some(state.version);
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
