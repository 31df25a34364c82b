//! PDE CLI - Command line tool for extracting historian process data and
//! aligning it with lab sample measurements.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pde-cli",
    version,
    about = "Process data extraction and lab-alignment toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: pde_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    pde_cmd::run(cli.command).await
}
