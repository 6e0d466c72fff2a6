mod cli;

use std::process;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use xbat_lib::auth::{CredentialManager, PasswordFlow};
use xbat_lib::download::Downloader;
use xbat_lib::request::Selector;
use xbat_lib::store::TokenStore;

use crate::cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), xbat_lib::error::Error> {
    let selector = Selector {
        job_id: args.job_id,
        group: args.group,
        metric: args.metric,
        level: args.level,
        node: args.node,
    }
    .validate()?;

    let request = selector.to_request(&args.api_base);
    info!("exporting job {} from {}", selector.job_id(), request.url);

    let flow = PasswordFlow::new(&args.api_base, &args.username, &args.password, &args.client_id);
    let manager = CredentialManager::new(flow, TokenStore::new(&args.token_file));
    let token = manager.get_token().await?;

    let result = Downloader::new()
        .download(&request, &token, &args.output_dir)
        .await?;

    if let Some(path) = result.body_path {
        println!("{}", path.display());
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(verbose)
                // stdout carries only the final output path
                .with_writer(std::io::stderr),
        )
        .init();
}
