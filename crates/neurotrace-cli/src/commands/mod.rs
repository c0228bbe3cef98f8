//! Command implementations for the CLI.

mod config;
mod convert;
mod generate;
mod inspect;
mod previews;
mod split;

pub use config::cmd_config;
pub use convert::{ConvertArgs, ConvertOutcome, cmd_convert};
pub use generate::{GenerateArgs, GenerateOutcome, cmd_generate};
pub use inspect::{InspectArgs, cmd_inspect, inspect_report};
pub use previews::cmd_previews;
pub use split::{SplitArgs, cmd_split};
