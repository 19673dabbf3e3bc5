use clap::Parser;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod app;
mod assist;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;
mod setup;
mod system;
mod tips;

use crate::app::Application;
use crate::assist::AssistanceClient;
use crate::cli::Args;
use crate::commands::Dispatcher;
use crate::config::Config;
use crate::core::error::Result;
use crate::core::session::Session;
use crate::providers::OllamaBackend;
use crate::system::SystemInfo;

const LOG_ENV: &str = "TERMSAGE_LOG";

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn start(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path.clone()),
        None => Config::load(),
    };
    debug!("configuration loaded from {}", config.path().display());

    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.ai.base_url.clone());
    let backend = OllamaBackend::new(&base_url)?;

    let system = SystemInfo::new();
    let assistant = AssistanceClient::new(Box::new(backend), system.clone());
    let dispatcher = Dispatcher::new(assistant, system)?;

    let working_directory = std::env::current_dir()?;
    let mut session = Session::new(config, working_directory);
    if !args.no_ai {
        for note in setup::auto_configure(dispatcher.assistant(), &mut session).await {
            display::render(&note);
        }
    }
    if let Some(model) = &args.model {
        session.override_model(model);
    }
    if args.no_ai {
        session.suppress_ai();
    }

    Application::new(session, dispatcher).run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("termsage: {}", e);
            ExitCode::FAILURE
        }
    }
}
