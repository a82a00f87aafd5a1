//! Content-type driven rewrite policy and text substitutions.

/// Markers identifying an image generation payload in JSON responses.
pub const IMAGE_MARKERS: [&str; 2] = ["streamingImageGenerationResponse", "generatedImageUrls"];

const IMAGE_PATH: &str = "users/";
const PROXIED_IMAGE_PATH: &str = "assets/users/";

/// What to do with a response body, decided once from its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentPolicy {
    /// `text/*` or anything mentioning `json`; otherwise bytes pass through.
    pub textual: bool,
    /// Rewrite asset origin links to the relay origin.
    pub html: bool,
    /// Rewrite generated image paths.
    pub json: bool,
}

impl ContentPolicy {
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.trim().to_ascii_lowercase();
        let json = ct.contains("json");
        Self {
            textual: ct.starts_with("text/") || json,
            html: ct.contains("text/html"),
            json,
        }
    }

    pub fn kind(&self) -> &'static str {
        match (self.textual, self.html, self.json) {
            (false, _, _) => "binary",
            (true, true, _) => "html",
            (true, false, true) => "json",
            (true, false, false) => "text",
        }
    }
}

/// Literal substitutions applied to decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    /// Upstream asset origin as it appears in HTML, e.g. `https://assets.grok.com`.
    pub asset_origin: String,
    /// The relay's own origin as addressed by the browser.
    pub request_origin: String,
}

impl RewriteRules {
    pub fn new(asset_origin: impl Into<String>, request_origin: impl Into<String>) -> Self {
        Self {
            asset_origin: asset_origin.into(),
            request_origin: request_origin.into(),
        }
    }

    /// Apply the substitutions enabled by `policy` to one decoded chunk.
    ///
    /// Returns `None` when nothing changed.
    pub fn apply(&self, policy: &ContentPolicy, text: &str) -> Option<String> {
        let mut changed: Option<String> = None;

        if policy.html && !self.asset_origin.is_empty() && text.contains(&self.asset_origin) {
            changed = Some(text.replace(&self.asset_origin, &self.request_origin));
        }

        if policy.json {
            let current = changed.as_deref().unwrap_or(text);
            if IMAGE_MARKERS.iter().any(|m| current.contains(m)) && current.contains(IMAGE_PATH) {
                changed = Some(current.replace(IMAGE_PATH, PROXIED_IMAGE_PATH));
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RewriteRules {
        RewriteRules::new("https://assets.grok.com", "http://localhost:8000")
    }

    #[test]
    fn test_policy_from_content_type() {
        let html = ContentPolicy::from_content_type("text/html; charset=utf-8");
        assert!(html.textual && html.html && !html.json);

        let json = ContentPolicy::from_content_type("application/json");
        assert!(json.textual && json.json && !json.html);

        let ndjson = ContentPolicy::from_content_type("application/x-ndjson");
        assert_eq!(ndjson.kind(), "json");

        let css = ContentPolicy::from_content_type("text/css");
        assert_eq!(css.kind(), "text");

        let png = ContentPolicy::from_content_type("image/png");
        assert!(!png.textual);
        assert_eq!(ContentPolicy::from_content_type("").kind(), "binary");
    }

    #[test]
    fn test_policy_case_insensitive() {
        assert_eq!(ContentPolicy::from_content_type("Text/HTML").kind(), "html");
    }

    #[test]
    fn test_html_asset_links_rewritten() {
        let policy = ContentPolicy::from_content_type("text/html");
        let html = r#"<img src="https://assets.grok.com/a.png"><a href="https://assets.grok.com/b">"#;
        let out = rules().apply(&policy, html).unwrap();
        assert_eq!(
            out,
            r#"<img src="http://localhost:8000/a.png"><a href="http://localhost:8000/b">"#
        );
    }

    #[test]
    fn test_html_rule_ignored_for_json() {
        let policy = ContentPolicy::from_content_type("application/json");
        assert_eq!(rules().apply(&policy, r#"{"u":"https://assets.grok.com/x"}"#), None);
    }

    #[test]
    fn test_json_image_paths_rewritten_with_marker() {
        let policy = ContentPolicy::from_content_type("application/json");
        let body = r#"{"generatedImageUrls":["users/1/a.png","users/2/b.png"]}"#;
        let out = rules().apply(&policy, body).unwrap();
        assert_eq!(
            out,
            r#"{"generatedImageUrls":["assets/users/1/a.png","assets/users/2/b.png"]}"#
        );
    }

    #[test]
    fn test_json_without_marker_untouched() {
        let policy = ContentPolicy::from_content_type("application/json");
        assert_eq!(rules().apply(&policy, r#"{"path":"users/1"}"#), None);
    }

    #[test]
    fn test_html_rule_is_case_sensitive() {
        let policy = ContentPolicy::from_content_type("text/html");
        assert_eq!(rules().apply(&policy, "HTTPS://ASSETS.GROK.COM/x"), None);
    }
}
