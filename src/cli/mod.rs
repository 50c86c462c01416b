//! CLI module for TimeFlex.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and enabled controls
//! - `picker`: Custom duration picker
//! - `session`: Interactive foreground session

pub mod commands;
pub mod display;
pub mod picker;
pub mod session;

pub use commands::{parse_switch, Cli, Commands, CountdownArgs, SettingsAction};
pub use display::{Controls, Display};
pub use picker::TimePicker;
pub use session::{gate, parse_intent, run_interactive, Intent};
