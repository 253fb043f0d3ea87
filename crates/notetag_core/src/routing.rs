//! Navigation surface of the note views.
//!
//! # Responsibility
//! - Map a navigation path onto one of the list/new/show/edit views.
//! - Redirect every unmatched path to the list view.
//!
//! # Invariants
//! - `/new` takes precedence over `/:id`.
//! - Query strings, fragments and one trailing slash are ignored.
//! - A path with an empty segment (`//`) never matches a route.
//! - `navigate` follows at most one redirect and always ends on a `Route`.
//! - `/:id` and `/:id/edit` only resolve for ids of existing notes; any
//!   other id is treated as unmatched.

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Location every unmatched path is redirected to.
pub const ROOT_PATH: &str = "/";

static SHOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([^/]+)$").expect("valid show route regex"));
static EDIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([^/]+)/edit$").expect("valid edit route regex"));

/// View selected by a navigation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: note list with tag filtering.
    List,
    /// `/new`: creation form.
    New,
    /// `/:id`: note detail placeholder.
    Show { id: String },
    /// `/:id/edit`: note edit placeholder.
    Edit { id: String },
}

impl Route {
    /// Canonical location of this route.
    pub fn path(&self) -> String {
        match self {
            Self::List => ROOT_PATH.to_string(),
            Self::New => "/new".to_string(),
            Self::Show { id } => format!("/{id}"),
            Self::Edit { id } => format!("/{id}/edit"),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Result of matching one path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Route(Route),
    Redirect { to: String },
}

/// Outcome of a navigation, after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Final location shown to the user.
    pub location: String,
    pub route: Route,
    /// Original path when a redirect happened.
    pub redirected_from: Option<String>,
}

/// Matches `path` against the route table.
pub fn match_route(path: &str) -> RouteMatch {
    let Some(normalized) = normalize_path(path) else {
        return RouteMatch::Redirect {
            to: ROOT_PATH.to_string(),
        };
    };

    if normalized == ROOT_PATH {
        return RouteMatch::Route(Route::List);
    }
    if normalized == "/new" {
        return RouteMatch::Route(Route::New);
    }
    if let Some(caps) = EDIT_RE.captures(&normalized) {
        return RouteMatch::Route(Route::Edit {
            id: caps[1].to_string(),
        });
    }
    if let Some(caps) = SHOW_RE.captures(&normalized) {
        return RouteMatch::Route(Route::Show {
            id: caps[1].to_string(),
        });
    }

    RouteMatch::Redirect {
        to: ROOT_PATH.to_string(),
    }
}

/// Resolves `path` to its final view, following a redirect if needed.
///
/// `note_exists` decides whether an `/:id` segment names a stored note.
pub fn navigate(path: &str, note_exists: impl Fn(&str) -> bool) -> Navigation {
    let matched = match match_route(path) {
        RouteMatch::Route(Route::Show { id } | Route::Edit { id }) if !note_exists(&id) => {
            RouteMatch::Redirect {
                to: ROOT_PATH.to_string(),
            }
        }
        other => other,
    };

    match matched {
        RouteMatch::Route(route) => Navigation {
            location: route.path(),
            route,
            redirected_from: None,
        },
        RouteMatch::Redirect { to } => {
            info!("event=navigate module=routing status=redirect to={to}");
            let route = match match_route(&to) {
                RouteMatch::Route(route) => route,
                RouteMatch::Redirect { .. } => Route::List,
            };
            Navigation {
                location: route.path(),
                route,
                redirected_from: Some(path.to_string()),
            }
        }
    }
}

fn normalize_path(path: &str) -> Option<String> {
    let without_fragment = path.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    let trimmed = without_query.trim();
    if trimmed.contains("//") {
        return None;
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    Some(normalized)
}
