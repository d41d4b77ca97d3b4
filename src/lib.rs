// src/lib.rs
//! # Scrublog
//!
//! `scrublog` is a sensitive-data redaction and secure-logging core. It
//! detects and masks secrets (tokens, passwords, credentials, identifiers
//! that resemble secrets) inside arbitrary structured data — request
//! parameters, HTTP headers, JSON payloads, URLs, and free-form error
//! contexts — before that data reaches a log sink or an external response.
//!
//! The library is pure and stateless: it performs only CPU-bound traversal
//! and string matching, no network or disk I/O, and is safe to call from
//! any number of concurrent threads without locking.
//!
//! ## Modules
//!
//! * `config`: Defines `FilterConfig` and the name/value pattern rules,
//!   including embedded defaults, file loading, and additive merging.
//! * `errors`: The `ScrublogError` type for clear error reporting.
//! * `registry`: Compiles the configuration into an immutable
//!   `PatternRegistry` of key matchers and precompiled value regexes.
//! * `engine`: The `RedactionEngine`, a pure traversal over JSON-like
//!   values implementing redaction, URL filtering, and request
//!   sanitization.
//! * `correlation`: Short unique ids that stitch related log lines
//!   together across one logical operation.
//! * `logger`: The `SecureLogger` facade that routes every structured
//!   payload through the engine before it reaches the underlying sink.
//!
//! ## Usage Example
//!
//! ```rust
//! use scrublog::{new_correlation_id, RedactionEngine, SecureLogger};
//! use serde_json::json;
//!
//! let engine = RedactionEngine::new();
//!
//! // Standalone redaction of a structured payload.
//! let redacted = engine.redact(&json!({
//!     "username": "john.doe",
//!     "password": "hunter2",
//! }));
//! assert_eq!(redacted["username"], "john.doe");
//! assert_eq!(redacted["password"], "[FILTERED]");
//!
//! // URL query parameters are filtered by name.
//! let url = engine.redact_url("https://api.example.com/data?user=a&api_key=b");
//! assert_eq!(url, "https://api.example.com/data?user=a&api_key=[FILTERED]");
//!
//! // The logging facade redacts everything it writes and tags entries
//! // with a correlation id.
//! let logger = SecureLogger::new(engine);
//! let cid = new_correlation_id();
//! logger.debug_request("GET", "https://api.example.com/data", None, None, &cid);
//! ```
//!
//! ## Error Handling
//!
//! Redaction itself never fails: malformed URLs and unexpected value
//! shapes degrade to pass-through, and payloads past the recursion-depth
//! ceiling are replaced wholesale rather than traversed. Fallible
//! operations are limited to construction time — pattern loading and
//! compilation — and use `anyhow::Error` on the loading paths with the
//! specific [`ScrublogError`] type underneath.
//!
//! ## Design Principles
//!
//! * **Fail closed:** any internal defensive check that trips resolves to
//!   over-redaction, never to a leaked secret or a missing log line.
//! * **Stateless:** the engine holds no mutable state; the registry is
//!   immutable after construction.
//! * **Additive configuration:** deployments can extend the pattern set
//!   but never remove or weaken a default pattern.
//! * **One sanctioned entry point:** payloads that may carry secrets go
//!   through [`SecureLogger`], never straight to the sink.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod correlation;
pub mod engine;
pub mod errors;
pub mod logger;
pub mod registry;

/// Re-exports the public configuration types and functions for managing
/// the sensitive-data pattern set.
pub use config::{
    merge_patterns,
    validate_patterns,
    FilterConfig,
    MatchKind,
    NamePatternRule,
    ValuePatternRule,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ScrublogError;

/// Re-exports the compiled pattern registry and the shared default
/// instance.
pub use registry::{default_registry, PatternRegistry, MIN_VALUE_LENGTH};

/// Re-exports the redaction engine and its options.
pub use engine::{
    RedactOptions,
    RedactionEngine,
    DEFAULT_REPLACEMENT,
    HEADER_REPLACEMENT,
    MAX_REDACTION_DEPTH,
};

/// Re-exports correlation-id generation for request tracing.
pub use correlation::{new_correlation_id, CorrelationId, CORRELATION_ID_LEN};

/// Re-exports the secure logging facade and its sink seam.
pub use logger::{FacadeSink, LogSink, SecureLogger};
