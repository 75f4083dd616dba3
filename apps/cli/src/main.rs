use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lazyhand_input::{ActionExecutor, CommandForwarder, InputController};
use lazyhand_pipeline::{
    CommandHandler, Dispatcher, FrameWorker, GesturePipeline, PipelineControl, PipelineSettings,
};
use lazyhand_protocol::{JsonLinesSink, MessageSinkRef};
use lazyhand_voice::{ForwardingRecognizer, SpeechRecognizer, VoiceWorker};

mod lines;

use lines::{apply_control, parse_line, InputLine};

#[derive(Parser)]
#[command(name = "lazyhand", version, about = "Control the cursor and keyboard with hand gestures")]
struct Cli {
    /// Settings file (defaults to <config_dir>/lazyhand/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read hand frames from stdin and act on recognized gestures
    Run {
        /// Write protocol commands to stdout instead of driving this machine
        #[arg(long)]
        emit: bool,
    },
    /// Read protocol commands from stdin and apply them to this machine
    Serve,
    /// Print the effective settings
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries protocol output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lazyhand=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = PipelineSettings::load_or_default(cli.config.as_deref())
        .context("failed to load settings")?;

    match cli.command {
        Commands::Run { emit } => run(settings, emit).await,
        Commands::Serve => serve().await,
        Commands::Config { write } => show_config(&settings, cli.config.as_deref(), write),
    }
}

async fn run(settings: PipelineSettings, emit: bool) -> anyhow::Result<()> {
    tracing::info!(
        emit,
        camera_index = settings.camera_index,
        show_detect_window = settings.show_detect_window,
        "Starting gesture pipeline"
    );

    if !emit && !lazyhand_input::ensure_accessibility_access() {
        tracing::warn!("Accessibility permission missing, input injection will fail");
    }

    let sink: MessageSinkRef = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let control = PipelineControl::new(settings.fullscreen_keys()?);

    let voice = emit.then(|| {
        let voice_sink = Arc::clone(&sink);
        VoiceWorker::spawn(move || {
            Ok(Box::new(ForwardingRecognizer::new(voice_sink)) as Box<dyn SpeechRecognizer>)
        })
    });

    let mut worker = {
        let settings = settings.clone();
        let control = control.clone();
        let sink = Arc::clone(&sink);
        FrameWorker::spawn(move || {
            let executor: Box<dyn ActionExecutor> = if emit {
                Box::new(
                    CommandForwarder::new(Arc::clone(&sink))
                        .with_screen_size(settings.fallback_screen()),
                )
            } else {
                Box::new(InputController::new()?)
            };
            let mut dispatcher = Dispatcher::new(executor, control, sink);
            if let Some(voice) = voice {
                dispatcher = dispatcher.with_voice(voice);
            }
            Ok(GesturePipeline::new(&settings, dispatcher))
        })
        .context("failed to start frame worker")?
    };

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::info!("Input closed");
                    break;
                };
                match parse_line(&line) {
                    Some(Ok(InputLine::Frame(frame))) => {
                        worker.submit(frame);
                    }
                    Some(Ok(InputLine::Control { control: update })) => {
                        apply_control(update, &control, sink.as_ref());
                    }
                    Some(Err(e)) => tracing::warn!(error = %e, "Skipping malformed input line"),
                    None => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    worker.stop();
    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    if !lazyhand_input::ensure_accessibility_access() {
        tracing::warn!("Accessibility permission missing, input injection will fail");
    }

    let replies: MessageSinkRef = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let executor = InputController::new().context("failed to initialize input controller")?;
    let mut handler = CommandHandler::new(Box::new(executor), replies);
    tracing::info!("Serving protocol commands on stdin");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                handler.handle_line(&line);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn show_config(settings: &PipelineSettings, path: Option<&Path>, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);

    if write {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => PipelineSettings::default_path().context("no config directory on this platform")?,
        };
        settings.save(&path)?;
        tracing::info!(path = %path.display(), "Settings written");
    }
    Ok(())
}
