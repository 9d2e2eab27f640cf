//! Session token handlers.
//!
//! The token is issued by the main system; these commands only place it in
//! (or remove it from) the configured store.

use secrecy::SecretString;
use serde::Serialize;

use timetable_api::Session;
use timetable_config::TokenStoreKind;

use crate::cli::{GlobalOpts, TokenArgs, TokenCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Serialize)]
struct TokenStatus {
    authenticated: bool,
    store: TokenStoreKind,
    login_url: String,
}

pub fn handle(ctx: &Context, args: TokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TokenCommand::Set { token } => {
            let token = match token {
                Some(token) => token,
                None => rpassword::prompt_password("Token: ")?,
            };
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "must not be empty".into(),
                });
            }

            Session::new(ctx.store()).set_token(SecretString::from(token.to_owned()))?;
            if ctx.settings.token_store == TokenStoreKind::Memory {
                tracing::warn!("memory token store does not outlive this process");
            }
            if !global.quiet {
                eprintln!("Token stored ({})", ctx.settings.token_store);
            }
            Ok(())
        }

        TokenCommand::Clear => {
            Session::new(ctx.store()).clear_token()?;
            if !global.quiet {
                eprintln!("Token cleared");
            }
            Ok(())
        }

        TokenCommand::Status => {
            let status = TokenStatus {
                authenticated: ctx.guard().is_authenticated(),
                store: ctx.settings.token_store,
                login_url: ctx.login_url()?.to_string(),
            };
            let out = output::render_single(
                &global.output,
                &status,
                |s| {
                    if s.authenticated {
                        format!("Authenticated (token in {} store)", s.store)
                    } else {
                        format!("Not authenticated. Log in at {}", s.login_url)
                    }
                },
                |s| s.authenticated.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
