//! Command definitions for the TimeFlex CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::format::parse_time_input;
use crate::types::{find_preset, SettingsField};

// ============================================================================
// CLI Structure
// ============================================================================

/// TimeFlex - countdown timer and stopwatch
#[derive(Parser, Debug)]
#[command(
    name = "timeflex",
    version,
    about = "Countdown timer and stopwatch for the terminal",
    long_about = "Run a countdown or a stopwatch in the foreground.\n\
                  Alerts on completion with a notification, sound and screen flash,\n\
                  each controlled by persisted settings.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the settings file
    #[arg(long, global = true, env = "TIMEFLEX_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a countdown timer
    Countdown(CountdownArgs),

    /// Run a stopwatch
    Stopwatch,

    /// List the duration presets
    Presets,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Send a test notification using the current settings
    TestNotification,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the current settings
    Show,

    /// Flip a setting (sound, vibration or theme)
    Toggle {
        #[arg(value_parser = parse_field)]
        field: SettingsField,
    },

    /// Set a setting: `sound on|off`, `vibration on|off`, `theme light|dark`
    Set {
        #[arg(value_parser = parse_field)]
        field: SettingsField,
        value: String,
    },
}

// ============================================================================
// Countdown Command Arguments
// ============================================================================

/// Arguments for the countdown command
#[derive(Args, Debug, Clone, Default)]
pub struct CountdownArgs {
    /// Duration as seconds, m:s or h:m:s
    #[arg(value_parser = parse_duration, conflicts_with = "preset")]
    pub duration: Option<u32>,

    /// Use a preset length in minutes (5, 10, 15 or 25)
    #[arg(short, long, value_parser = parse_preset)]
    pub preset: Option<u32>,
}

impl CountdownArgs {
    /// Returns the configured duration in seconds, if any.
    pub fn seconds(&self) -> Option<u32> {
        self.duration.or(self.preset)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a duration; zero is rejected.
fn parse_duration(s: &str) -> Result<u32, String> {
    match parse_time_input(s) {
        0 => Err("duration must be greater than zero".to_string()),
        seconds => Ok(seconds),
    }
}

/// Maps a preset length in minutes to seconds.
fn parse_preset(s: &str) -> Result<u32, String> {
    let minutes: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of minutes"))?;
    find_preset(minutes)
        .map(|preset| preset.seconds)
        .ok_or_else(|| "preset must be one of 5, 10, 15 or 25".to_string())
}

fn parse_field(s: &str) -> Result<SettingsField, String> {
    s.parse()
}

/// Parses an on/off switch value.
pub fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("'{other}' is not on or off")),
    }
}

// ============================================================================
// Tests
// ============================================================================
