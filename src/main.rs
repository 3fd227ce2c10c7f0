use anyhow::Result;
use clap::Parser;

use ocm_util::{
    cli::{handle_command, Cli},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    handle_command(&cli).await
}
