//! Utility modules.

/// Date/time serialization helpers for record-set timestamps.
pub mod datetime;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;

/// Warning sinks for capability adjustments.
pub mod warning_sink;
