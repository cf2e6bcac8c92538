// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for failures surfaced to the UI layer.
//
// Only navigation failures reach the user directly; everything else is either
// logged or reported to the hosted content, which owns its own messaging.
// The mapping still covers every variant so the UI never shows a raw code.

use crate::error::CamterError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or server hiccup; a retry is likely to help.
    Transient,
    /// User must do something (grant a permission, reconnect).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the UI should offer a retry affordance.
    pub retriable: bool,
    pub severity: Severity,
}

impl HumanError {
    fn transient(message: &str, suggestion: &str) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable: true,
            severity: Severity::Transient,
        }
    }

    fn action(message: &str, suggestion: &str) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    }

    fn permanent(message: &str, suggestion: &str) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}

/// Convert a `CamterError` into a `HumanError`.
pub fn humanize_error(err: &CamterError) -> HumanError {
    match err {
        CamterError::LoadFailed(detail) => humanize_load_failure(detail),
        CamterError::Network(_) | CamterError::Timeout => HumanError::transient(
            "We couldn't reach the server.",
            "Check your internet connection, then tap Retry.",
        ),
        CamterError::PermissionDenied => HumanError::action(
            "Permission is needed for this.",
            "Allow access in your device settings, then try again.",
        ),
        CamterError::Cancelled => HumanError::action("Cancelled.", "You can try again at any time."),
        CamterError::PlatformUnavailable => HumanError::permanent(
            "This feature isn't available on this device.",
            "Try again from the mobile app.",
        ),
        CamterError::InvalidUrl(_) => HumanError::permanent(
            "That link doesn't look right.",
            "Open the app and navigate from the home screen instead.",
        ),
        CamterError::MissingSource
        | CamterError::UnknownAction(_)
        | CamterError::InvalidArgument(_)
        | CamterError::MalformedMessage(_) => HumanError::permanent(
            "Something went wrong inside the app.",
            "Please update the app to the latest version.",
        ),
        CamterError::Database(_)
        | CamterError::Io(_)
        | CamterError::Serialization(_)
        | CamterError::Bridge(_) => HumanError::transient(
            "Something went wrong on this device.",
            "Close the app and open it again.",
        ),
    }
}

/// Map an HTTP status that made a page load fail.
///
/// 4xx statuses never reach this function; the host container ignores them.
pub fn humanize_http_status(status: u16) -> HumanError {
    match status {
        502..=504 => HumanError::transient(
            "The service is temporarily unavailable.",
            "Please wait a moment, then tap Retry.",
        ),
        500..=599 => HumanError::transient(
            "The server had a problem loading this page.",
            "Tap Retry. If this keeps happening, try again later.",
        ),
        _ => HumanError::transient("This page couldn't be loaded.", "Tap Retry."),
    }
}

fn humanize_load_failure(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("internet_disconnected") || lower.contains("not connected") {
        HumanError::transient(
            "You're offline.",
            "Connect to Wi-Fi or mobile data, then tap Retry.",
        )
    } else if lower.contains("timed_out") || lower.contains("timed out") {
        HumanError::transient(
            "The page took too long to load.",
            "Your connection might be slow. Tap Retry.",
        )
    } else if lower.contains("name_not_resolved") || lower.contains("host") {
        HumanError::transient(
            "We couldn't find the server.",
            "Check your internet connection, then tap Retry.",
        )
    } else {
        HumanError::transient("This page couldn't be loaded.", "Tap Retry.")
    }
}
