// Author: Dustin Pilgrim
// License: MIT

use clap::Parser;
use lapse::{app, cli};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let args = cli::Args::parse();

    if args.command.is_some() {
        return app::command::run(args).await;
    }

    app::watch_mode::run(args).await
}
