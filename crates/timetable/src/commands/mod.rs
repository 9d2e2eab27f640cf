//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod schedule;
pub mod staff;
pub mod token;
pub mod util;

use std::sync::Arc;

use tracing::debug;
use url::Url;

use timetable_api::{
    ApiClient, Navigation, Route, Session, SessionGuard, TokenStore, TransportConfig,
};
use timetable_config::{AppConfig, Settings};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Resolved configuration plus the token store, shared by every handler.
pub struct Context {
    pub settings: Settings,
    pub app: AppConfig,
    store: Arc<dyn TokenStore>,
}

impl Context {
    pub fn new(settings: Settings, app: AppConfig) -> Result<Self, CliError> {
        let store = settings.open_token_store()?;
        Ok(Self {
            settings,
            app,
            store,
        })
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store())
    }

    /// The configured origin, or the API host when none is set (local).
    pub fn origin(&self) -> Result<Url, CliError> {
        Ok(self
            .settings
            .origin_url()?
            .unwrap_or_else(|| self.app.api_base_url.clone()))
    }

    /// Where the main system handles login.
    pub fn login_url(&self) -> Result<Url, CliError> {
        Ok(SessionGuard::login_url(&self.origin()?))
    }

    /// Pass the session guard, then build an API client on a fresh session.
    pub fn authorize(&self) -> Result<ApiClient, CliError> {
        match self.guard().navigate(Route::StaffTimetable.path(), &self.origin()?) {
            Navigation::Redirect { location } => Err(CliError::NotAuthenticated {
                login_url: location.to_string(),
            }),
            Navigation::Proceed { title, .. } => {
                debug!(%title, "access granted");
                self.client()
            }
        }
    }

    fn client(&self) -> Result<ApiClient, CliError> {
        let session = Arc::new(Session::new(self.store()));
        Ok(ApiClient::new(
            &self.app.api_base_url,
            session,
            &TransportConfig::default(),
        )?)
    }
}

/// Dispatch a command that needs resolved configuration.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Staff(args) => staff::handle(ctx, args, global).await,
        Command::Schedule(args) => schedule::handle(ctx, args, global).await,
        Command::Token(args) => token::handle(ctx, args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
