//! Structured logging field names for docvault.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, e.g. a failed best-effort remote deletion |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "storage"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "upload_coordinator", "pool", "cloudinary"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "delete", "compensate"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Object store identifier of an uploaded file.
pub const REMOTE_ID: &str = "remote_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Payload size in bytes.
pub const SIZE_BYTES: &str = "size_bytes";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique() {
        let mut fields = vec![
            REQUEST_ID,
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            DOCUMENT_ID,
            REMOTE_ID,
            DURATION_MS,
            SIZE_BYTES,
            ERROR_MSG,
        ];
        let len = fields.len();
        fields.sort_unstable();
        fields.dedup();
        assert_eq!(fields.len(), len);
    }
}
