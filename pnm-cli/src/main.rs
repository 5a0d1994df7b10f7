//! PNM CLI - Command line tool for the national park management database.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pnm-cli",
    version,
    about = "National park management database toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: pnm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    pnm_cmd::run(cli.command)
}
