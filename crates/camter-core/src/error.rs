// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Camter shell.
//
// Bridge-facing variants render as the short machine codes that the hosted
// web content matches on, so `to_string()` is what ends up in the `error`
// field of a `BridgeResponse`.

use thiserror::Error;

/// Top-level error type for all shell operations.
#[derive(Debug, Error)]
pub enum CamterError {
    // -- Bridge errors (reported to the hosted content) --
    #[error("permission_denied")]
    PermissionDenied,

    #[error("cancelled")]
    Cancelled,

    #[error("missing_source")]
    MissingSource,

    #[error("unknown_action")]
    UnknownAction(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("timeout")]
    Timeout,

    // -- Transport --
    #[error("malformed bridge message: {0}")]
    MalformedMessage(String),

    // -- Deep links / navigation --
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("page load failed: {0}")]
    LoadFailed(String),

    // -- Remote services --
    #[error("network request failed: {0}")]
    Network(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl CamterError {
    /// Rebuild an error from the code carried in a failed `BridgeResponse`.
    /// Codes without a dedicated variant come back as `Bridge`.
    pub fn from_wire_code(code: &str) -> Self {
        match code {
            "permission_denied" => Self::PermissionDenied,
            "cancelled" => Self::Cancelled,
            "missing_source" => Self::MissingSource,
            "unknown_action" => Self::UnknownAction(String::new()),
            "timeout" => Self::Timeout,
            other => Self::Bridge(other.to_string()),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CamterError>;
