//! TimeFlex CLI - countdown timer and stopwatch for the terminal
//!
//! Runs a countdown or a stopwatch in the foreground and alerts on
//! completion with a notification, a sound and a screen flash, each gated
//! by persisted settings.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use tracing::debug;

use timeflex::alert::{AlertDispatcher, ConsoleNotifier, TerminalHaptics};
use timeflex::cli::{parse_switch, run_interactive, Cli, Commands, Display, SettingsAction};
use timeflex::engine::TimerController;
use timeflex::settings::{FileKeyValueStore, SettingsStore};
use timeflex::sound;
use timeflex::types::{SettingsField, Theme, TimerMode};

/// Time for a pending screen flash to restore before the process exits.
const FLASH_SETTLE: Duration = Duration::from_millis(200);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the session line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Some(Commands::Countdown(args)) => {
            let store = open_settings(data_dir).await?;
            let (controller, events) = TimerController::create(dispatcher(&store));
            run_interactive(controller, events, store, TimerMode::Countdown, args.seconds())
                .await?;
        }
        Some(Commands::Stopwatch) => {
            let store = open_settings(data_dir).await?;
            let (controller, events) = TimerController::create(dispatcher(&store));
            run_interactive(controller, events, store, TimerMode::Stopwatch, None).await?;
        }
        Some(Commands::Presets) => {
            Display::show_presets();
        }
        Some(Commands::Settings { action }) => {
            let store = open_settings(data_dir).await?;
            let pending = match action {
                None | Some(SettingsAction::Show) => None,
                Some(SettingsAction::Toggle { field }) => Some(store.toggle(field)),
                Some(SettingsAction::Set { field, value }) => Some(match field {
                    SettingsField::Sound => store.set_sound_enabled(parse_value(&value)?),
                    SettingsField::Vibration => {
                        store.set_vibration_enabled(parse_value(&value)?)
                    }
                    SettingsField::Theme => {
                        let theme: Theme = value.parse().map_err(|e: String| anyhow!(e))?;
                        store.set_theme(theme)
                    }
                }),
            };

            if let Some(handle) = pending {
                handle.await.context("Settings write did not finish")?;
            }
            Display::show_settings(&store.get());
        }
        Some(Commands::TestNotification) => {
            let store = open_settings(data_dir).await?;
            let result = dispatcher(&store).send_test_notification();
            tokio::time::sleep(FLASH_SETTLE).await;
            result.map_err(|e| anyhow!("{}\n  hint: {}", e, e.suggestion()))?;
            Display::show_test_notification_success();
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

/// Opens and loads the settings store.
async fn open_settings(data_dir: Option<&Path>) -> Result<Arc<SettingsStore>> {
    let backend = match data_dir {
        Some(dir) => FileKeyValueStore::new(dir),
        None => FileKeyValueStore::in_config_dir()?,
    };
    debug!("Settings directory: {}", backend.dir().display());

    let store = Arc::new(SettingsStore::new(Arc::new(backend)));
    store.load().await;
    Ok(store)
}

/// Builds the alert dispatcher over the terminal backends.
fn dispatcher(store: &SettingsStore) -> Arc<AlertDispatcher> {
    Arc::new(AlertDispatcher::new(
        store.subscribe(),
        Arc::new(ConsoleNotifier),
        Arc::new(TerminalHaptics),
        sound::default_player(),
    ))
}

fn parse_value(value: &str) -> Result<bool> {
    parse_switch(value).map_err(|e| anyhow!(e))
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
