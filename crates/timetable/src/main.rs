mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use timetable_config::Settings;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over `-v`; debug-mode
/// environments start at `info` instead of `warn`.
fn init_tracing(verbosity: u8, debug_env: bool) {
    let filter = match (verbosity, debug_env) {
        (0, false) => "warn",
        (0, true) | (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    // Shell completions need neither configuration nor logging
    if let Command::Completions(args) = &command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "timetable", &mut std::io::stdout());
        return Ok(());
    }

    let settings = resolve_settings(&global)?;
    let app = settings.app_config();
    init_tracing(global.verbose, app.as_ref().is_ok_and(|a| a.debug));

    match command {
        // Config commands must work even when the settings don't resolve
        Command::Config(args) => commands::config_cmd::handle(args, &settings, &global),

        cmd => {
            let app = app?;
            tracing::debug!(
                environment = %app.environment,
                base_url = %app.api_base_url,
                locale = %app.locale,
                timezone = %app.timezone,
                "configuration resolved"
            );
            let ctx = Context::new(settings, app)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &ctx, &global).await
        }
    }
}

/// Settings file + `TIMETABLE_*` env, with `--mode` / `--origin` on top.
fn resolve_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = timetable_config::load_settings()?;
    if let Some(mode) = &global.mode {
        settings.mode = Some(mode.clone());
    }
    if let Some(origin) = &global.origin {
        settings.origin = Some(origin.clone());
    }
    Ok(settings)
}
