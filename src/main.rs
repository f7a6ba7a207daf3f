use anyhow::Result;
use clap::Parser;
use pitaka::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
