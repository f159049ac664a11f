mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppEvent, AppModel, FetchRequest, FetchResult};
use crate::cli::CliInvocation;
use crate::infra::{
    API_TOKEN_ENV, API_URL_ENV, ApiOverrides, FilesApi, HttpFilesApi, LOG_PATH_ENV, TIMEOUT_ENV,
    init_file_logging, init_stderr_logging, resolve_api_config,
};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),

    #[error(transparent)]
    Config(#[from] crate::infra::ConfigError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Tui { api } => run_tui(&api),
        CliInvocation::Command { api, command } => {
            init_stderr_logging();
            let api = build_api(&api)?;
            let mut out = io::stdout().lock();
            crate::cli::run(command, &api, &mut out)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name}: browse parsed line records served by a files API\n\nUSAGE:\n  {name} [--api-url URL] [--token TOKEN]   Start the TUI\n  {name} files [--json]                    Print the file list\n  {name} rows [file] [--json]              Print flattened rows (all files when omitted)\n  {name} --help | --version\n\nOUTPUT:\n  files: one file name per line\n  rows:  file_name<TAB>text<TAB>number<TAB>hex  (--json prints an array of rows)\n\nENV:\n  {url_env}      API base URL (default: {default_url})\n  {token_env}    Bearer token sent with every request\n  {timeout_env} Request timeout in seconds (default: 10)\n  {log_env}             TUI log file (default: ~/.filegrid/filegrid.log)\n  RUST_LOG                 Log filter\n",
        name = env!("CARGO_PKG_NAME"),
        url_env = API_URL_ENV,
        token_env = API_TOKEN_ENV,
        timeout_env = TIMEOUT_ENV,
        log_env = LOG_PATH_ENV,
        default_url = crate::infra::DEFAULT_API_URL,
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn build_api(overrides: &ApiOverrides) -> Result<HttpFilesApi, crate::infra::ConfigError> {
    let config = resolve_api_config(overrides)?;
    if config.token.is_none() {
        warn!("no API token configured; requests are sent without Authorization");
    }
    info!(base_url = %config.base_url, "using files API");
    Ok(HttpFilesApi::new(config))
}

fn run_tui(overrides: &ApiOverrides) -> Result<(), MainError> {
    let log_path = init_file_logging();
    let api = build_api(overrides)?;
    let notice = api
        .config()
        .token
        .is_none()
        .then(|| format!("No API token set ({API_TOKEN_ENV} or --token)"));
    let mut model = AppModel::new(&api.config().base_url)
        .with_log_path(log_path)
        .with_notice(notice);

    let api: Arc<dyn FilesApi> = Arc::new(api);
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut model, api);
    restore_terminal(&mut terminal)?;
    Ok(result?)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: &mut AppModel,
    api: Arc<dyn FilesApi>,
) -> Result<(), app::AppError> {
    let (fetch_tx, fetch_rx) = channel::<FetchResult>();

    let (next, command) = app::update(model.clone(), AppEvent::Mounted);
    *model = next;
    if dispatch(command, &api, &fetch_tx) {
        return Ok(());
    }

    loop {
        while let Ok(result) = fetch_rx.try_recv() {
            let (next, command) = app::update(model.clone(), AppEvent::Fetched(result));
            *model = next;
            if dispatch(command, &api, &fetch_tx) {
                return Ok(());
            }
        }

        terminal.draw(|frame| ui::render(frame, model))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                let (next, command) = app::update(model.clone(), AppEvent::Key(key));
                *model = next;
                if dispatch(command, &api, &fetch_tx) {
                    return Ok(());
                }
            }
        }
    }
}

/// Starts the command's work; returns true when the app should exit.
fn dispatch(command: AppCommand, api: &Arc<dyn FilesApi>, tx: &Sender<FetchResult>) -> bool {
    match command {
        AppCommand::None => false,
        AppCommand::Quit => true,
        AppCommand::Fetch(request) => {
            spawn_fetch(api, request, tx);
            false
        }
    }
}

fn spawn_fetch(api: &Arc<dyn FilesApi>, request: FetchRequest, tx: &Sender<FetchResult>) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = app::execute(api.as_ref(), request);
        let _ = tx.send(result);
    });
}
