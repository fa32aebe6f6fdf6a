//! Error types for quietcut-av.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool could not be run or exited unsuccessfully.
    ///
    /// `status` is the exit code when the process ran to completion and
    /// `stderr` holds its captured diagnostic output.
    #[error("tool execution failed: {tool} (status {}): {message}", display_status(.status))]
    ToolFailed {
        tool: String,
        status: Option<i32>,
        message: String,
        stderr: String,
    },

    /// Failed to parse tool output.
    #[error("failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// A seek target lies before the first known keyframe.
    #[error("seek target {target:.4}s precedes the first keyframe{}", display_first(.first_keyframe))]
    OutOfRange {
        target: f64,
        first_keyframe: Option<f64>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid record data, such as a malformed timestamp.
    #[error(transparent)]
    Common(#[from] quietcut_common::Error),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

fn display_first(first: &Option<f64>) -> String {
    match first {
        Some(k) => format!(" at {k:.4}s"),
        None => " (no keyframes)".to_string(),
    }
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error without a captured exit status.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            status: None,
            message: message.into(),
            stderr: String::new(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
