//! TinyTimer CLI - a countdown timer with a celebration at the end
//!
//! Pick a duration (10 seconds to an hour), a completion track and a
//! character, then watch it count down:
//! - Ticking sound while running
//! - A notification when time is up
//! - Music and confetti to celebrate

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use tinytimer::cli::{Cli, Commands, Display, RunArgs, Session};
use tinytimer::engine::{Collaborators, CountdownEngine};
use tinytimer::live::{ChannelLiveStatus, LiveStatusDisplay, NoopLiveStatus};
use tinytimer::notification::{NotifierConfig, ScheduledNotifier};
use tinytimer::sound::{try_create_player, AudioPlayer, SilentAudioPlayer, SoundLibrary};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            run_countdown(args).await?;
        }
        Some(Commands::Themes) => {
            Display::show_themes();
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs an interactive countdown on stdin/stdout.
async fn run_countdown(args: RunArgs) -> Result<()> {
    let config = args.to_config();
    if let Err(message) = config.validate() {
        anyhow::bail!(message);
    }

    let library = match &args.sounds_dir {
        Some(dir) => SoundLibrary::new(dir),
        None => SoundLibrary::builtin_only(),
    };
    let audio: Arc<dyn AudioPlayer> = match try_create_player(library, args.no_sound) {
        Some(player) => player,
        None => Arc::new(SilentAudioPlayer),
    };

    let notifier_config = if args.no_notify {
        NotifierConfig::disabled()
    } else {
        NotifierConfig::default()
    };
    let (notifier, receivers) = ScheduledNotifier::new(notifier_config)?;
    let notifier = Arc::new(notifier);

    let mut live_updates = None;
    let live: Arc<dyn LiveStatusDisplay> = if args.no_live {
        Arc::new(NoopLiveStatus)
    } else {
        let (live, updates) = ChannelLiveStatus::new();
        live_updates = Some(updates);
        Arc::new(live)
    };

    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let services = Collaborators::new(audio, notifier.clone(), live);
    let engine = CountdownEngine::new(services, event_tx);

    let mut session = Session::new(engine, event_rx, config).with_notifier(notifier);
    if let Some(updates) = live_updates {
        session = session.with_live_updates(updates);
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let snapshot = session.run(input, Some(receivers)).await?;

    if args.json {
        Display::show_snapshot_json(&snapshot)?;
    } else {
        Display::show_goodbye(&snapshot);
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
