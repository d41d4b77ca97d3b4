//! logger.rs - A logging facade that redacts everything it writes.
//!
//! `SecureLogger` wraps exactly one underlying sink and routes every
//! structured payload through the `RedactionEngine` before emission,
//! prefixing each line with a correlation id. It is the sanctioned logging
//! entry point for any payload that may contain user- or
//! credential-derived data; by convention, call sites do not write such
//! payloads to the sink directly.
//!
//! The error text passed to [`SecureLogger::error_with_context`] is not
//! itself pattern-scanned: callers must avoid embedding secrets in error
//! messages.
//!
//! License: MIT OR Apache-2.0

use log::Level;
use serde_json::Value;
use std::sync::Arc;

use crate::correlation::CorrelationId;
use crate::engine::RedactionEngine;

/// The capability `SecureLogger` writes to.
///
/// Implementations own persistence and transport of log lines (stdout,
/// file, remote collector) and must make their writes atomic per entry
/// under concurrent callers. They must not block callers indefinitely.
pub trait LogSink: Send + Sync {
    fn write(&self, level: Level, message: &str);
}

/// The default sink: forwards every entry to the `log` crate macros, so
/// whatever logger the host process installed receives the line.
#[derive(Debug, Default)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write(&self, level: Level, message: &str) {
        log::log!(level, "{message}");
    }
}

/// Secure logging wrapper that automatically filters sensitive data.
///
/// Safe to share across all call sites: the engine is pure and the sink is
/// behind an `Arc`.
#[derive(Clone)]
pub struct SecureLogger {
    engine: RedactionEngine,
    sink: Arc<dyn LogSink>,
}

impl SecureLogger {
    /// Creates a logger that writes through the `log` facade.
    pub fn new(engine: RedactionEngine) -> Self {
        Self::with_sink(engine, Arc::new(FacadeSink))
    }

    /// Creates a logger writing to a caller-supplied sink.
    pub fn with_sink(engine: RedactionEngine, sink: Arc<dyn LogSink>) -> Self {
        Self { engine, sink }
    }

    /// Returns the redaction engine backing this logger.
    pub fn engine(&self) -> &RedactionEngine {
        &self.engine
    }

    /// Logs an outbound HTTP request at debug severity, with the URL,
    /// params and headers redacted.
    pub fn debug_request(
        &self,
        method: &str,
        url: &str,
        params: Option<&Value>,
        headers: Option<&Value>,
        correlation_id: &CorrelationId,
    ) {
        let sanitized = self.engine.sanitize_request(method, url, params, headers, None);

        let mut parts = Vec::new();
        if let Value::Object(fields) = &sanitized {
            for (key, entry) in fields {
                match entry {
                    Value::Object(_) => parts.push(format!("{key}=({})", format_fields(entry))),
                    other => parts.push(format!("{key}={}", format_scalar(other))),
                }
            }
        }

        let message = format!("[{correlation_id}] HTTP Request: {}", parts.join(", "));
        self.sink.write(Level::Debug, &message);
    }

    /// Logs an HTTP response's status and size at debug severity. Bodies
    /// are deliberately not logged here.
    pub fn debug_response(&self, status: u16, size_bytes: usize, correlation_id: &CorrelationId) {
        let message = format!(
            "[{correlation_id}] HTTP Response: status={status}, size={size_bytes}bytes"
        );
        self.sink.write(Level::Debug, &message);
    }

    /// Logs an error together with a redacted context mapping.
    pub fn error_with_context(
        &self,
        message: &str,
        error: &dyn std::error::Error,
        correlation_id: &CorrelationId,
        context: &Value,
    ) {
        let filtered = self.engine.redact(context);

        let mut line = format!("[{correlation_id}] Error: {message} - {error}");
        if !is_empty_context(&filtered) {
            line.push_str(&format!(" | Context: {filtered}"));
        }
        self.sink.write(Level::Error, &line);
    }

    /// Logs an informational message together with a redacted context
    /// mapping.
    pub fn info_with_context(
        &self,
        message: &str,
        correlation_id: &CorrelationId,
        context: &Value,
    ) {
        let filtered = self.engine.redact(context);

        let mut line = format!("[{correlation_id}] {message}");
        if !is_empty_context(&filtered) {
            line.push_str(&format!(" | Context: {filtered}"));
        }
        self.sink.write(Level::Info, &line);
    }

    /// Logs a security-relevant event (authentication, authorization,
    /// audit) as a fixed-shape line at the given severity.
    pub fn security_event(
        &self,
        event_type: &str,
        description: &str,
        severity: Level,
        correlation_id: &CorrelationId,
        context: &Value,
    ) {
        let filtered = self.engine.redact(context);

        let line = format!(
            "[{correlation_id}] SECURITY_EVENT: {event_type} | {description} | Context: {filtered}"
        );
        self.sink.write(severity, &line);
    }
}

/// Renders a redacted mapping as `k=v` pairs for request log lines.
fn format_fields(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, entry)| format!("{key}={}", format_scalar(entry)))
            .collect::<Vec<String>>()
            .join(", "),
        other => format_scalar(other),
    }
}

/// Renders a scalar without quoting strings; everything else as JSON.
fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_context(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_fields_renders_pairs_in_order() {
        let value = json!({"method": "GET", "retries": 2});
        assert_eq!(format_fields(&value), "method=GET, retries=2");
    }

    #[test]
    fn empty_contexts_are_detected() {
        assert!(is_empty_context(&Value::Null));
        assert!(is_empty_context(&json!({})));
        assert!(!is_empty_context(&json!({"k": "v"})));
        assert!(!is_empty_context(&json!([])));
    }
}
