//! seismic CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use seismic_core::{TracingConfig, init_tracing};
use seismic_providers::FetchContext;

use seismic_client::cli::{Cli, Command, ConfigAction};
use seismic_client::commands;
use seismic_client::config::ClientConfig;
use seismic_client::error::{ClientError, ClientResult};
use seismic_client::service::EventService;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::cli(cli.debug)) {
        eprintln!("warning: {}", e);
    }

    let format = cli.output_format();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            if let Err(write_err) =
                commands::query::report_error(&e, format, &mut io::stdout(), &mut io::stderr())
            {
                eprintln!("error: {} (failed to report: {})", e, write_err);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    let mut out = io::stdout().lock();
    match cli.command {
        Some(Command::Providers) => commands::providers::list(&mut out),
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path, &mut out),
            ConfigAction::Validate => commands::config::validate(&config, &mut out),
            ConfigAction::Path => commands::config::path(&config_path, &mut out),
        },
        None => {
            let fetch_config = config.to_fetch_config().map_err(ClientError::Config)?;
            let defaults = config.to_query_defaults().map_err(ClientError::Config)?;
            let ctx = FetchContext::new(fetch_config)?;
            let service = EventService::new(ctx, defaults);
            commands::query::run(&service, &cli.fetch_params(), cli.output_format(), &mut out)
                .await
        }
    }
}
