//! Upstream path resolution.
//!
//! Maps an inbound path onto one of the two upstream origins. Rules are
//! evaluated in order and the first match wins:
//!
//! | inbound prefix | origin  | forwarded path   |
//! |----------------|---------|------------------|
//! | `/grok`        | primary | prefix stripped  |
//! | `/assets`      | asset   | prefix stripped  |
//! | anything else  | primary | unchanged        |

use std::fmt;

use crate::config::UpstreamConfig;
use crate::routing::matcher::PathPrefixMatcher;

/// Which upstream origin a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Primary,
    Asset,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Primary => "primary",
            Origin::Asset => "asset",
        }
    }
}

/// The concrete origin URLs (`scheme://host[:port]`, no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamOrigins {
    pub primary: String,
    pub asset: String,
}

impl UpstreamOrigins {
    pub fn new(primary: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            primary: trim_origin(primary.into()),
            asset: trim_origin(asset.into()),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.primary_origin.clone(), config.asset_origin.clone())
    }

    pub fn get(&self, origin: Origin) -> &str {
        match origin {
            Origin::Primary => &self.primary,
            Origin::Asset => &self.asset,
        }
    }
}

fn trim_origin(mut origin: String) -> String {
    while origin.ends_with('/') {
        origin.pop();
    }
    origin
}

/// Where a single request is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub origin: Origin,
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
}

impl UpstreamTarget {
    /// Absolute upstream URL for this target.
    ///
    /// An empty path resolves to the origin root and a path that lost its
    /// leading slash to prefix stripping gets it back.
    pub fn url(&self, origins: &UpstreamOrigins) -> String {
        let mut url = String::from(origins.get(self.origin));
        if !self.path.starts_with('/') {
            url.push('/');
        }
        url.push_str(&self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin.as_str(), self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

/// Ordered prefix rules mapping inbound paths to upstream targets.
#[derive(Debug, Clone)]
pub struct UpstreamResolver {
    rules: Vec<(PathPrefixMatcher, Origin)>,
}

impl Default for UpstreamResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamResolver {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (PathPrefixMatcher::new("/grok"), Origin::Primary),
                (PathPrefixMatcher::new("/assets"), Origin::Asset),
            ],
        }
    }

    /// Resolve a path and query. Total: every input yields a target.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> UpstreamTarget {
        let query = query.unwrap_or_default().to_string();
        for (matcher, origin) in &self.rules {
            if let Some(rest) = matcher.strip(path) {
                return UpstreamTarget {
                    origin: *origin,
                    path: rest.to_string(),
                    query,
                };
            }
        }
        UpstreamTarget {
            origin: Origin::Primary,
            path: path.to_string(),
            query,
        }
    }
}
