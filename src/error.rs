//! # Error Handling
//!
//! Hierarchical error types for the scanning pipeline, with error
//! classification traits and per-error context.
//!
//! ## Architecture
//!
//! - **Error Types**: one variant per pipeline stage (acquire, filter,
//!   encode, upload) plus the usual infrastructure categories
//! - **Error Context**: timestamp, operation, recovery suggestion,
//!   severity and free-form metadata attached to every error
//! - **Classification Traits**: `Retryable`, `Recoverable`,
//!   `HasSeverity`, `HasRecoverySuggestion`
//!
//! The source-acquisition errors are deliberately *recoverable*: when
//! the primary source (camera) cannot supply a bitmap, the caller is
//! expected to fall back to the alternate source (file picker) rather
//! than abort. See [`crate::source::acquire_with_fallback`].
//!
//! ## Usage
//!
//! ```rust
//! use docscan::error::{ScanError, Recoverable};
//!
//! let error = ScanError::acquire("camera", "permission denied")
//!     .with_recovery_suggestion("select an image file instead");
//! assert!(error.is_recoverable());
//! ```

use std::{error::Error as StdError, fmt, time::SystemTime};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Debug-level errors that don't affect operation
    Debug,
    /// Informational errors
    Info,
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that affect operation but can be recovered from
    Error,
    /// Critical errors that require immediate attention
    Critical,
    /// Fatal errors that cannot be recovered from
    Fatal,
}

/// Core error context containing metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Whether this error is retryable
    pub retryable: bool,
    /// Whether this error is recoverable
    pub recoverable: bool,
    /// Additional metadata as key-value pairs
    pub metadata: std::collections::HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            retryable: false,
            recoverable: false,
            metadata: std::collections::HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }
}

/// Base error type for the scanning pipeline
#[derive(Debug)]
pub enum ScanError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// Bitmap acquisition failures (camera frame or file decode)
    Acquire {
        source_kind: String,
        reason: String,
        context: ErrorContext,
    },
    /// Filter/tone transform pipeline errors
    Processing {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// Image encoding errors (JPEG/PNG serialization)
    Encode {
        format: String,
        reason: String,
        context: ErrorContext,
    },
    /// Storage backend upload errors
    Upload {
        backend: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Network errors
    Network {
        operation: String,
        address: Option<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// Authentication/authorization errors
    Auth {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// Validation errors
    Validation {
        field: String,
        constraint: String,
        value: String,
        context: ErrorContext,
    },
    /// Timeout errors
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
}

impl ScanError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a bitmap acquisition error.
    /// Acquisition failures are recoverable by default: the caller can
    /// fall back to an alternate source.
    pub fn acquire(source_kind: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut context = ErrorContext::new();
        context.recoverable = true;
        Self::Acquire {
            source_kind: source_kind.into(),
            reason: reason.into(),
            context,
        }
    }

    /// Create a processing error
    pub fn processing(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Processing {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an encoding error
    pub fn encode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an upload error
    pub fn upload(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upload {
            backend: backend.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error with the affected path
    pub fn io_at(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: Some(path.into()),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a network error
    pub fn network(operation: impl Into<String>) -> Self {
        Self::Network {
            operation: operation.into(),
            address: None,
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create an authentication error
    pub fn auth(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Auth {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms,
            context: ErrorContext::new(),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Mark as retryable
    pub fn retryable(mut self) -> Self {
        self.context_mut().retryable = true;
        self
    }

    /// Mark as recoverable
    pub fn recoverable(mut self) -> Self {
        self.context_mut().recoverable = true;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::Acquire { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Encode { context, .. } => context,
            Self::Upload { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Network { context, .. } => context,
            Self::Auth { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::Timeout { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    /// Get mutable reference to error context
    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::Acquire { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Encode { context, .. } => context,
            Self::Upload { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Network { context, .. } => context,
            Self::Auth { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::Timeout { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Acquire { .. } => "acquire",
            Self::Processing { .. } => "processing",
            Self::Encode { .. } => "encode",
            Self::Upload { .. } => "upload",
            Self::Io { .. } => "io",
            Self::Network { .. } => "network",
            Self::Auth { .. } => "auth",
            Self::Validation { .. } => "validation",
            Self::Timeout { .. } => "timeout",
            Self::External { .. } => "external",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            ScanError::Acquire {
                source_kind,
                reason,
                ..
            } => {
                write!(f, "Could not acquire bitmap from {}: {}", source_kind, reason)
            }
            ScanError::Processing {
                operation, reason, ..
            } => {
                write!(f, "Processing failed during {}: {}", operation, reason)
            }
            ScanError::Encode { format, reason, .. } => {
                write!(f, "Encoding to {} failed: {}", format, reason)
            }
            ScanError::Upload {
                backend, reason, ..
            } => {
                write!(f, "Upload to {} failed: {}", backend, reason)
            }
            ScanError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(f, "I/O error during {} on '{}': {}", operation, path, source)
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            ScanError::Network {
                operation, address, ..
            } => {
                if let Some(address) = address {
                    write!(f, "Network error during {} on {}", operation, address)
                } else {
                    write!(f, "Network error during {}", operation)
                }
            }
            ScanError::Auth {
                operation, reason, ..
            } => {
                write!(f, "Authentication error during {}: {}", operation, reason)
            }
            ScanError::Validation {
                field,
                constraint,
                value,
                ..
            } => {
                write!(
                    f,
                    "Validation failed for '{}': {} (value: {})",
                    field, constraint, value
                )
            }
            ScanError::Timeout {
                operation,
                duration_ms,
                ..
            } => {
                write!(f, "Timeout during {} after {}ms", operation, duration_ms)
            }
            ScanError::External {
                library, source, ..
            } => {
                write!(f, "External library error in {}: {}", library, source)
            }
        }
    }
}

impl StdError for ScanError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::External { source, .. } => Some(source.as_ref()),
            Self::Network {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type ScanResult<T> = Result<T, ScanError>;

/// Trait for errors that can be retried
pub trait Retryable {
    /// Check if this error can be retried
    fn is_retryable(&self) -> bool;

    /// Get the recommended retry delay in milliseconds
    fn retry_delay_ms(&self) -> Option<u64> {
        None
    }
}

impl Retryable for ScanError {
    fn is_retryable(&self) -> bool {
        self.context().retryable
            || matches!(
                self,
                Self::Timeout { .. } | Self::Network { .. } | Self::Io { .. }
            )
    }

    fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            Self::Timeout { .. } => Some(1000),
            Self::Network { .. } => Some(2000),
            Self::Io { .. } => Some(100),
            _ => None,
        }
    }
}

/// Trait for errors that can be recovered from
pub trait Recoverable {
    /// Check if this error can be recovered from
    fn is_recoverable(&self) -> bool;

    /// Get recovery strategies for this error
    fn recovery_strategies(&self) -> Vec<RecoveryStrategy>;
}

/// Recovery strategies for handling errors
#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    /// Retry the operation
    Retry { max_attempts: usize, delay_ms: u64 },
    /// Use a fallback source or method
    Fallback { description: String },
    /// Skip the current operation
    Skip { reason: String },
}

impl Recoverable for ScanError {
    fn is_recoverable(&self) -> bool {
        self.context().recoverable
            || matches!(
                self,
                Self::Acquire { .. } | Self::Timeout { .. } | Self::Network { .. }
            )
    }

    fn recovery_strategies(&self) -> Vec<RecoveryStrategy> {
        match self {
            Self::Acquire { .. } => vec![RecoveryStrategy::Fallback {
                description: "Acquire the bitmap from the alternate source".to_string(),
            }],
            Self::Timeout { .. } => vec![RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            }],
            Self::Network { .. } => vec![RecoveryStrategy::Retry {
                max_attempts: 1,
                delay_ms: 2000,
            }],
            Self::Upload { .. } => vec![RecoveryStrategy::Skip {
                reason: "Keep the local copy and let the user retry manually".to_string(),
            }],
            _ => vec![],
        }
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for ScanError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for ScanError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Check if an error is transient (may resolve itself)
    pub fn is_transient(error: &ScanError) -> bool {
        matches!(error, ScanError::Timeout { .. } | ScanError::Network { .. })
    }

    /// Check if an error is fatal (cannot be recovered from)
    pub fn is_fatal(error: &ScanError) -> bool {
        matches!(
            error,
            ScanError::Config { .. } | ScanError::Auth { .. } | ScanError::Validation { .. }
        ) || error.severity() == ErrorSeverity::Fatal
    }
}

/// Error conversion implementations
impl From<std::io::Error> for ScanError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for ScanError {
    fn from(error: image::ImageError) -> Self {
        Self::external("image", error)
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(error: reqwest::Error) -> Self {
        let address = error.url().map(|u| u.to_string());
        if error.is_timeout() {
            let mut timeout = Self::timeout(
                "http_request",
                crate::upload::REQUEST_TIMEOUT.as_millis() as u64,
            );
            if let Some(address) = address {
                timeout = timeout.with_metadata("address", address);
            }
            return timeout;
        }
        Self::Network {
            operation: "http_request".to_string(),
            address,
            source: Some(Box::new(error)),
            context: ErrorContext::new(),
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}
