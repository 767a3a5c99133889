//! cbot-cli: command-line client for the cloud bot execution API.
//! One primary action per run; every failure prints to stderr and exits 1.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use std::process;

use cbot::config::{CredentialStore, LoggingSettings, stdio_prompt};
use cbot::infra::telemetry;
use clap::Parser;
use tracing::debug;

use args::{Action, Cli};
use client::{CliError, Ctx};
use handlers::profile;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(error) = run(cli).await {
        report_error(&error);
        process::exit(1);
    }
}

fn report_error(error: &CliError) {
    debug!(error = ?error, "command failed");
    eprintln!("{error}");
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let logging = LoggingSettings::from_overrides(cli.log_level.as_deref(), cli.log_json)?;
    telemetry::init(&logging)?;

    let action = cli.action()?;
    let store = CredentialStore::locate(cli.config_dir)?;
    let mut prompt = stdio_prompt();
    let mut out = std::io::stdout();

    match action {
        Action::Reconfigure => profile::reconfigure(&store, &mut prompt, &mut out),
        Action::ShowProfile => {
            let credentials = store.load_or_create(&mut prompt)?;
            profile::show(&credentials, &mut out)
        }
        Action::Api(api_action) => {
            let credentials = store.load_or_create(&mut prompt)?;
            let ctx = Ctx::new(&credentials)?;
            handlers::handle(&ctx, api_action, &mut out).await
        }
    }
}
