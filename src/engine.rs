//! engine.rs - The redaction engine: pure traversal over JSON-like values.
//!
//! `RedactionEngine` produces a redacted copy of any `serde_json::Value`,
//! replacing sensitive leaves with a fixed replacement token while
//! preserving the shape of everything else. It performs no I/O, holds no
//! mutable state, and never fails for any input value: malformed or
//! unexpected data degrades to pass-through (or, past the depth ceiling,
//! to wholesale replacement), never to an error that could block the
//! caller's primary operation.
//!
//! License: MIT OR Apache-2.0

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::registry::{default_registry, PatternRegistry};

/// The default token substituted for sensitive values.
pub const DEFAULT_REPLACEMENT: &str = "[FILTERED]";

/// The replacement token used for HTTP headers, which are assumed hostile.
pub const HEADER_REPLACEMENT: &str = "[REDACTED]";

/// Maximum nesting depth the engine will traverse. Anything deeper is
/// replaced wholesale with the replacement token: over-redacting an
/// absurdly deep payload is safer than unbounded recursion.
pub const MAX_REDACTION_DEPTH: usize = 64;

/// Options controlling a redaction pass.
#[derive(Debug, Clone)]
pub struct RedactOptions {
    /// The token substituted for sensitive values.
    pub replacement: String,
    /// Whether to recurse into nested mappings and sequences.
    pub deep_scan: bool,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            replacement: DEFAULT_REPLACEMENT.to_string(),
            deep_scan: true,
        }
    }
}

impl RedactOptions {
    pub fn with_replacement(replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
            ..Self::default()
        }
    }
}

/// Stateless redaction over JSON-like values, backed by a shared
/// `PatternRegistry`.
///
/// The engine is cheap to clone and safe to call from any number of
/// threads concurrently: the registry is immutable and every operation is
/// a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    registry: Arc<PatternRegistry>,
}

impl RedactionEngine {
    /// Creates an engine backed by the embedded default pattern set.
    pub fn new() -> Self {
        Self {
            registry: Arc::clone(default_registry()),
        }
    }

    /// Creates an engine backed by a caller-supplied registry.
    pub fn with_registry(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry backing this engine.
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Produces a redacted copy of `value` using the default options
    /// (`"[FILTERED]"`, deep scan enabled).
    pub fn redact(&self, value: &Value) -> Value {
        self.redact_with(value, &RedactOptions::default())
    }

    /// Produces a redacted copy of `value`.
    ///
    /// For mappings, a key matching a name pattern consumes its whole value
    /// (no recursion into it); otherwise string values are tested against
    /// the value patterns, and nested containers are recursed into when
    /// `deep_scan` is set. Sequences apply the same rules per element.
    /// Non-string scalars are only ever replaced via a key match. The
    /// output has the same shape as the input at every level except
    /// replaced leaves.
    pub fn redact_with(&self, value: &Value, options: &RedactOptions) -> Value {
        self.redact_at_depth(value, options, 0)
    }

    fn redact_at_depth(&self, value: &Value, options: &RedactOptions, depth: usize) -> Value {
        if depth > MAX_REDACTION_DEPTH {
            // Fail closed: leaking is strictly worse than over-redacting.
            return Value::String(options.replacement.clone());
        }

        match value {
            Value::Object(map) => {
                if depth > 0 && !options.deep_scan {
                    return value.clone();
                }
                let mut redacted = Map::new();
                for (key, entry) in map {
                    if self.registry.is_sensitive_key(key) {
                        // A matched key consumes the whole value, nested or
                        // not.
                        redacted.insert(key.clone(), Value::String(options.replacement.clone()));
                    } else {
                        redacted.insert(key.clone(), self.redact_at_depth(entry, options, depth + 1));
                    }
                }
                Value::Object(redacted)
            }
            Value::Array(items) => {
                if depth > 0 && !options.deep_scan {
                    return value.clone();
                }
                Value::Array(
                    items
                        .iter()
                        .map(|item| self.redact_at_depth(item, options, depth + 1))
                        .collect(),
                )
            }
            Value::String(s) if self.registry.is_sensitive_value(s) => {
                Value::String(options.replacement.clone())
            }
            other => other.clone(),
        }
    }

    /// Redacts sensitive query parameters from a URL, replacing their
    /// values with `"[FILTERED]"`.
    pub fn redact_url(&self, url: &str) -> String {
        self.redact_url_with(url, DEFAULT_REPLACEMENT)
    }

    /// Redacts sensitive query parameters from a URL.
    ///
    /// The query string is split heuristically on `?`, `&` and `=`; the
    /// scheme, host, path, parameter order and non-sensitive parameters are
    /// preserved byte for byte. Malformed input is returned unchanged
    /// rather than risking a partially-processed secret.
    pub fn redact_url_with(&self, url: &str, replacement: &str) -> String {
        let Some((base, query)) = url.split_once('?') else {
            return url.to_string();
        };

        let params: Vec<String> = query
            .split('&')
            .map(|param| match param.split_once('=') {
                Some((key, _)) if self.registry.is_sensitive_key(key) => {
                    format!("{key}={replacement}")
                }
                _ => param.to_string(),
            })
            .collect();

        format!("{base}?{}", params.join("&"))
    }

    /// Builds a redacted, structured view of an HTTP request suitable for
    /// logging: `{method, url, params?, headers?, body?}`.
    ///
    /// Headers are always filtered, with `"[REDACTED]"` as the replacement,
    /// since they routinely carry auth tokens.
    pub fn sanitize_request(
        &self,
        method: &str,
        url: &str,
        params: Option<&Value>,
        headers: Option<&Value>,
        body: Option<&Value>,
    ) -> Value {
        let mut sanitized = Map::new();
        sanitized.insert("method".to_string(), Value::String(method.to_string()));
        sanitized.insert("url".to_string(), Value::String(self.redact_url(url)));

        if let Some(params) = params {
            sanitized.insert("params".to_string(), self.redact(params));
        }

        if let Some(headers) = headers {
            let options = RedactOptions::with_replacement(HEADER_REPLACEMENT);
            sanitized.insert("headers".to_string(), self.redact_with(headers, &options));
        }

        if let Some(body) = body {
            sanitized.insert("body".to_string(), self.redact(body));
        }

        Value::Object(sanitized)
    }
}

impl Default for RedactionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matched_key_consumes_nested_value() {
        let engine = RedactionEngine::new();
        let input = json!({"api_key": {"inner": "visible-if-not-for-key-match"}});
        let redacted = engine.redact(&input);
        assert_eq!(redacted, json!({"api_key": "[FILTERED]"}));
    }

    #[test]
    fn non_string_scalars_replaced_only_by_key_match() {
        let engine = RedactionEngine::new();
        let input = json!({"token": 12345, "retries": 3, "enabled": true, "note": null});
        let redacted = engine.redact(&input);
        assert_eq!(
            redacted,
            json!({"token": "[FILTERED]", "retries": 3, "enabled": true, "note": null})
        );
    }

    #[test]
    fn shallow_scan_leaves_nested_containers_alone() {
        let engine = RedactionEngine::new();
        let input = json!({
            "password": "top-level",
            "nested": {"password": "below"}
        });
        let options = RedactOptions {
            deep_scan: false,
            ..RedactOptions::default()
        };
        let redacted = engine.redact_with(&input, &options);
        assert_eq!(redacted["password"], "[FILTERED]");
        assert_eq!(redacted["nested"]["password"], "below");
    }

    #[test]
    fn depth_ceiling_redacts_instead_of_recursing() {
        let engine = RedactionEngine::new();
        let mut value = json!("leaf");
        for _ in 0..(MAX_REDACTION_DEPTH + 8) {
            value = json!({ "level": value });
        }
        let redacted = engine.redact(&value);

        // Walk down to the ceiling; the subtree there must be the
        // replacement token, not a deeper structure.
        let mut cursor = &redacted;
        for _ in 0..=MAX_REDACTION_DEPTH {
            cursor = &cursor["level"];
        }
        assert_eq!(*cursor, json!("[FILTERED]"));
    }

    #[test]
    fn malformed_urls_pass_through() {
        let engine = RedactionEngine::new();
        assert_eq!(engine.redact_url("not a url at all"), "not a url at all");
        assert_eq!(engine.redact_url("https://host/path"), "https://host/path");
        assert_eq!(engine.redact_url("?&&="), "?&&=");
    }

    #[test]
    fn sanitize_request_shapes_payload() {
        let engine = RedactionEngine::new();
        let payload = engine.sanitize_request(
            "POST",
            "https://api.example.com/items?api_key=secret123",
            Some(&json!({"project": "demo"})),
            Some(&json!({"Authorization": "Bearer abc", "Accept": "application/json"})),
            Some(&json!({"password": "hunter2"})),
        );

        assert_eq!(payload["method"], "POST");
        assert_eq!(
            payload["url"],
            "https://api.example.com/items?api_key=[FILTERED]"
        );
        assert_eq!(payload["params"]["project"], "demo");
        assert_eq!(payload["headers"]["Authorization"], "[REDACTED]");
        assert_eq!(payload["headers"]["Accept"], "application/json");
        assert_eq!(payload["body"]["password"], "[FILTERED]");
    }
}
