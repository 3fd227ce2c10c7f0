/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;
mod output;

pub use args::{Cli, Commands, OutputFormat};
pub use commands::{handle_command, show_version};
pub use output::{emit, render_account, render_cluster, render_subscription};
