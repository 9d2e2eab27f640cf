//! Config subcommand handlers.

use serde::Serialize;
use tracing::info;

use timetable_config::{self as config, Environment, Settings, TokenStoreKind};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// What `config show` reports.
#[derive(Serialize)]
struct ConfigView {
    environment: Environment,
    api_base_url: String,
    debug: bool,
    locale: String,
    timezone: String,
    token_store: TokenStoreKind,
    config_file: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let app = settings.app_config()?;
            let view = ConfigView {
                environment: app.environment,
                api_base_url: app.api_base_url.to_string(),
                debug: app.debug,
                locale: app.locale,
                timezone: app.timezone,
                token_store: settings.token_store,
                config_file: config::config_path().display().to_string(),
            };
            let out = output::render_single(
                &global.output,
                &view,
                |v| {
                    output::render_pairs(&[
                        ("Environment", v.environment.to_string()),
                        ("API base URL", v.api_base_url.clone()),
                        ("Debug", v.debug.to_string()),
                        ("Locale", v.locale.clone()),
                        ("Timezone", v.timezone.clone()),
                        ("Token store", v.token_store.to_string()),
                        ("Config file", v.config_file.clone()),
                    ])
                },
                |v| v.api_base_url.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { token_store } => {
            let path = config::config_path();
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite {}?", path.display()),
                    "config init",
                    global.yes,
                )?
            {
                return Ok(());
            }

            let new = Settings {
                mode: settings.mode.clone(),
                origin: settings.origin.clone(),
                token_store: token_store.unwrap_or(settings.token_store),
            };
            // Refuse to write settings that cannot be resolved.
            new.app_config()?;

            let written = config::save_settings(&new)?;
            info!(path = %written.display(), "settings written");
            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
            }
            Ok(())
        }
    }
}
