//! arcade - catalog game launcher
//!
//! This is the CLI application that drives install, update and launch
//! pipelines through the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod serve;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::{EventHandler, Finished};
use crate::serve::ServeCommand;
use crate::setup::SystemSetup;
use arcade_config::Config;
use arcade_events::{EventReceiver, FailureContext, PipelineOutcome};
use arcade_ops::{OperationResult, Orchestrator, PlayOutcome};
use arcade_types::{ColorChoice, TitleId, TitleKey};
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // file config (or defaults), then environment overrides
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;

    init_tracing(&config, cli.global.json, cli.global.debug);
    info!("Starting arcade v{}", env!("CARGO_PKG_VERSION"));

    let mut setup = SystemSetup::new(config.clone());
    setup.initialize().await?;

    let (event_sender, event_receiver) = arcade_events::channel();
    let orchestrator = Orchestrator::new(setup.ops_context(event_sender)?);

    let color = cli.global.color.unwrap_or_default();
    let renderer = OutputRenderer::new(cli.global.json, color);
    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let result = match cli.command {
        Commands::List => {
            execute_command_with_events(
                async {
                    let titles = arcade_ops::list_titles(orchestrator.context()).await?;
                    Ok(OperationResult::TitleList(titles))
                },
                event_receiver,
                &mut event_handler,
            )
            .await?
        }
        Commands::Status => {
            execute_command_with_events(
                async {
                    let report = arcade_ops::status(&orchestrator).await?;
                    Ok(OperationResult::Status(report))
                },
                event_receiver,
                &mut event_handler,
            )
            .await?
        }
        Commands::Remove { title } => {
            execute_command_with_events(
                async {
                    orchestrator.remove(&TitleId::from(title.as_str())).await?;
                    Ok(OperationResult::Success(format!("Removed {title}")))
                },
                event_receiver,
                &mut event_handler,
            )
            .await?
        }
        Commands::Play { title, index } => {
            let key = cli::title_key(&title, index).map_err(CliError::InvalidArguments)?;
            play_and_wait(&orchestrator, key, event_receiver, &mut event_handler).await?
        }
        Commands::Serve => {
            serve(
                &orchestrator,
                &config,
                &renderer,
                event_receiver,
                &mut event_handler,
            )
            .await?
        }
    };

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute a command future with concurrent event handling
async fn execute_command_with_events<F>(
    command: F,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError>
where
    F: Future<Output = Result<OperationResult, CliError>>,
{
    let mut command_future = Box::pin(command);

    loop {
        select! {
            result = &mut command_future => {
                drain_events(&mut event_receiver, event_handler);
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Start a pipeline and follow it to its outcome
///
/// Ctrl-C stops the pipeline, including a running game.
async fn play_and_wait(
    orchestrator: &Orchestrator,
    key: TitleKey,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let pipeline_id = match orchestrator.play(key).await? {
        PlayOutcome::Started { pipeline_id } => pipeline_id,
        busy @ PlayOutcome::Busy { .. } => {
            drain_events(&mut event_receiver, event_handler);
            return Ok(OperationResult::Play(busy));
        }
    };

    let mut interrupted = false;
    loop {
        select! {
            event = event_receiver.recv() => {
                let Some(event) = event else {
                    return Err(CliError::Setup("event channel closed".to_string()));
                };
                if let Some(finished) = event_handler.handle_event(event) {
                    if finished.pipeline_id == pipeline_id {
                        return outcome_result(finished);
                    }
                }
            }

            signal = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                match signal {
                    Ok(()) => {
                        info!("Interrupted, stopping pipeline");
                        orchestrator.stop_all().await;
                    }
                    Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
                }
            }
        }
    }
}

fn outcome_result(finished: Finished) -> Result<OperationResult, CliError> {
    let Finished { title, outcome, .. } = finished;
    match outcome {
        PipelineOutcome::Exited { code: Some(code) } => Ok(OperationResult::Success(format!(
            "{title} exited with code {code}"
        ))),
        PipelineOutcome::Exited { code: None } => {
            Ok(OperationResult::Success(format!("{title} closed")))
        }
        PipelineOutcome::Cancelled => Ok(OperationResult::Success(format!("{title} stopped"))),
        PipelineOutcome::NotFound => Err(CliError::Pipeline(FailureContext::new(
            Some("catalog.not_found"),
            format!("{title} has no download for this platform"),
            Some("run `arcade list` to see what can be played here"),
            false,
        ))),
        PipelineOutcome::Failed { failure } => Err(CliError::Pipeline(failure)),
    }
}

/// Keep the catalog fresh and run line commands from stdin until quit
async fn serve(
    orchestrator: &Orchestrator,
    config: &Config,
    renderer: &OutputRenderer,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let shutdown = CancellationToken::new();
    let refresh = Arc::clone(&orchestrator.context().catalog)
        .spawn_refresh_loop(config.catalog.refresh_interval(), shutdown.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("Serving play requests from stdin");

    let result = loop {
        select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ServeCommand>() {
                        Ok(ServeCommand::Quit) => break Ok(()),
                        Ok(command) => {
                            if let Err(e) = run_serve_command(orchestrator, renderer, command).await {
                                report_serve_error(renderer, &e);
                            }
                        }
                        Err(message) => {
                            report_serve_error(renderer, &CliError::InvalidArguments(message));
                        }
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(CliError::Io(e)),
            },

            Some(event) = event_receiver.recv() => {
                event_handler.handle_event(event);
            }

            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {e}");
                }
                break Ok(());
            }
        }
    };

    orchestrator.stop_all().await;
    shutdown.cancel();
    if let Err(e) = refresh.await {
        warn!("Catalog refresh task ended abnormally: {e}");
    }
    drain_events(&mut event_receiver, event_handler);

    result.map(|()| OperationResult::Success("Stopped serving".to_string()))
}

async fn run_serve_command(
    orchestrator: &Orchestrator,
    renderer: &OutputRenderer,
    command: ServeCommand,
) -> Result<(), CliError> {
    let result = match command {
        ServeCommand::Play(key) => OperationResult::Play(orchestrator.play(key).await?),
        ServeCommand::Stop => {
            orchestrator.stop_all().await;
            OperationResult::Success("Stopped".to_string())
        }
        ServeCommand::Status => OperationResult::Status(arcade_ops::status(orchestrator).await?),
        ServeCommand::Quit => return Ok(()),
    };
    renderer.render_result(&result)?;
    Ok(())
}

fn report_serve_error(renderer: &OutputRenderer, error: &CliError) {
    warn!("Serve command failed: {error}");
    if !renderer.is_json() {
        eprintln!("Error: {error}");
    }
}

fn drain_events(event_receiver: &mut EventReceiver, event_handler: &mut EventHandler) {
    while let Ok(event) = event_receiver.try_recv() {
        event_handler.handle_event(event);
    }
}

/// Open `<data dir>/logs/arcade-<timestamp>.log`
fn open_log_file(config: &Config) -> Option<(PathBuf, std::fs::File)> {
    let log_dir = match config.logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Warning: Failed to resolve log directory: {e}");
            return None;
        }
    };
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "arcade-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => Some((log_file, file)),
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

/// Initialize tracing/logging
fn init_tracing(config: &Config, json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // structured JSON logs to file, in both output modes
        if let Some((path, file)) = open_log_file(config) {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(env_filter("info,arcade=debug,arcade_ops=debug"))
                .init();
            if !json_mode {
                eprintln!("Debug logging enabled: {}", path.display());
            }
            return;
        }
    }

    if json_mode {
        // keep stdout clean for JSON output
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter("info,arcade=debug"))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter("warn"))
            .init();
    }
}
