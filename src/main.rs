//! stage-release CLI entry point.

use clap::Parser;

use stage_release::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => cli::handle_error(&err, cli.json),
    };

    let _logger = match cli::init_logging(&config, cli.verbose) {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(&err, cli.json),
    };

    let result = match cli.command {
        Commands::Release(args) => cli::commands::release::execute(args, &config, cli.json).await,
        Commands::Watch(args) => cli::commands::watch::execute(args, &config, cli.json).await,
        Commands::Policies => {
            cli::commands::policies::execute(cli.json);
            Ok(())
        }
    };

    if let Err(err) = result {
        cli::handle_error(&err, cli.json);
    }
}
