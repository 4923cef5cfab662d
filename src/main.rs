use anyhow::Result;
use clap::Parser;
use pocketbook::cli::{Cli, init_logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run().await
}
