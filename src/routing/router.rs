//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the local route table (exact path + optional method)
//! - Classify each request into exactly one [`Route`]
//! - Fall through to the proxy for any path the table does not own
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Classification is a pure function of method and path
//! - A known path with the wrong method is an explicit 405, never proxied

use axum::http::Method;

/// Outcome of classifying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST /api/sync`
    SyncAccounts,
    /// `POST /api/account`
    SaveAccount,
    /// `/` and `/index.html`, any method.
    StaticShell,
    /// Known local path, unsupported method.
    MethodNotAllowed,
    /// Everything else goes upstream.
    Proxy,
}

impl Route {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::SyncAccounts => "sync",
            Route::SaveAccount => "account",
            Route::StaticShell => "shell",
            Route::MethodNotAllowed => "method_not_allowed",
            Route::Proxy => "proxy",
        }
    }
}

#[derive(Debug, Clone)]
struct RouteEntry {
    path: &'static str,
    /// `None` accepts any method.
    method: Option<Method>,
    route: Route,
}

/// The relay's local route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Build the standard table.
    pub fn new() -> Self {
        let entries = vec![
            RouteEntry {
                path: "/api/sync",
                method: Some(Method::POST),
                route: Route::SyncAccounts,
            },
            RouteEntry {
                path: "/api/account",
                method: Some(Method::POST),
                route: Route::SaveAccount,
            },
            RouteEntry {
                path: "/",
                method: None,
                route: Route::StaticShell,
            },
            RouteEntry {
                path: "/index.html",
                method: None,
                route: Route::StaticShell,
            },
        ];
        Self { entries }
    }

    /// Classify a request by method and path.
    pub fn classify(&self, method: &Method, path: &str) -> Route {
        let mut path_known = false;
        for entry in self.entries.iter().filter(|e| e.path == path) {
            path_known = true;
            match &entry.method {
                None => return entry.route,
                Some(m) if m == method => return entry.route,
                Some(_) => {}
            }
        }

        if path_known {
            Route::MethodNotAllowed
        } else {
            Route::Proxy
        }
    }
}
