// Session guard and navigation gate
//
// Authentication here is a single predicate: does persistent storage hold a
// token right now? Nothing is validated locally; the API's 401 responses
// are the real enforcement point.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;
use url::Url;

use crate::session::{TokenStore, present};

const APP_SUFFIX: &str = "Agent Hub";
const FALLBACK_TITLE: &str = "Staff Timetable";

/// Views the client can show. There is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StaffTimetable,
}

impl Route {
    /// Match a path exactly. Only `/` (or the empty path) is a route.
    pub fn matches(path: &str) -> Option<Self> {
        match path.trim() {
            "" | "/" => Some(Self::StaffTimetable),
            _ => None,
        }
    }

    /// Resolve a path, sending anything unmatched to the main view.
    pub fn resolve(path: &str) -> Self {
        Self::matches(path).unwrap_or(Self::StaffTimetable)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::StaffTimetable => "/",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::StaffTimetable => "Gestión de Horarios",
        }
    }
}

/// Window title for a route, or the generic one when there is no route.
pub fn document_title(route: Option<Route>) -> String {
    let title = route.map_or(FALLBACK_TITLE, Route::title);
    format!("{title} - {APP_SUFFIX}")
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render `route`. `path` is the canonical path, which differs from the
    /// requested one when an unknown path was redirected.
    Proceed {
        route: Route,
        path: &'static str,
        title: String,
    },
    /// Leave the app entirely and log in at the main system.
    Redirect { location: Url },
}

/// Authentication predicate over the persistent token store.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// `true` iff the store holds a non-empty token. Re-read on every call.
    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    pub fn current_token(&self) -> Option<SecretString> {
        present(self.store.load())
    }

    /// The site root of `origin`, where the main system handles login.
    pub fn login_url(origin: &Url) -> Url {
        let mut url = origin.clone();
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Gate navigation to `path`.
    pub fn navigate(&self, path: &str, origin: &Url) -> Navigation {
        let route = Route::resolve(path);

        if !self.is_authenticated() {
            let location = Self::login_url(origin);
            info!(%location, "access denied: no authentication token, redirecting to main system");
            return Navigation::Redirect { location };
        }

        Navigation::Proceed {
            route,
            path: route.path(),
            title: document_title(Some(route)),
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}
