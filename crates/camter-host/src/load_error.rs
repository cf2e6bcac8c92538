// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebView load-error classification.

use camter_core::error::CamterError;
use camter_core::human_errors::{HumanError, humanize_error, humanize_http_status};
use camter_core::ShellConfig;
use tracing::{debug, warn};
use url::Url;

/// A failure reported by the WebView while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The server answered with an error status.
    Http { url: String, status: u16 },
    /// The load never produced a response (DNS, TLS, offline, aborted).
    Failed { url: String, description: String },
}

impl LoadError {
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::Failed { url, .. } => url,
        }
    }
}

/// What the container does with a load error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorAction {
    /// Known-noisy third-party payment widget; dropped silently.
    Filtered,
    /// Any status outside 5xx; the hosted content handles it.
    Ignored,
    /// Shown to the user with a retry affordance.
    Surface(HumanError),
}

#[derive(Debug, Clone)]
pub struct LoadErrorClassifier {
    payment_widget_hosts: Vec<String>,
}

impl LoadErrorClassifier {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            payment_widget_hosts: config
                .payment_widget_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, error: &LoadError) -> LoadErrorAction {
        if self.is_payment_widget(error.url()) {
            debug!(url = error.url(), "filtered payment widget load error");
            return LoadErrorAction::Filtered;
        }

        match error {
            LoadError::Http { url, status } if (500..=599).contains(status) => {
                warn!(%url, status, "page load failed with server error");
                LoadErrorAction::Surface(humanize_http_status(*status))
            }
            LoadError::Http { status, .. } => {
                debug!(url = error.url(), status, "ignoring non-server error status");
                LoadErrorAction::Ignored
            }
            LoadError::Failed { url, description } => {
                warn!(%url, %description, "page load failed");
                LoadErrorAction::Surface(humanize_error(&CamterError::LoadFailed(
                    description.clone(),
                )))
            }
        }
    }

    fn is_payment_widget(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        else {
            return false;
        };
        self.payment_widget_hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LoadErrorClassifier {
        LoadErrorClassifier::new(&ShellConfig::default())
    }

    #[test]
    fn payment_widget_errors_are_filtered() {
        let err = LoadError::Failed {
            url: "https://js.tosspayments.com/v1/payment-widget".into(),
            description: "net::ERR_CONNECTION_RESET".into(),
        };
        assert_eq!(classifier().classify(&err), LoadErrorAction::Filtered);
    }

    #[test]
    fn lookalike_hosts_are_not_filtered() {
        let err = LoadError::Http {
            url: "https://eviltosspayments.com/".into(),
            status: 500,
        };
        assert!(matches!(classifier().classify(&err), LoadErrorAction::Surface(_)));
    }

    #[test]
    fn client_errors_are_ignored() {
        let err = LoadError::Http {
            url: "https://app.camter.co.kr/missing".into(),
            status: 404,
        };
        assert_eq!(classifier().classify(&err), LoadErrorAction::Ignored);
    }

    #[test]
    fn statuses_outside_5xx_are_ignored() {
        for status in [0, 200, 302, 600] {
            let err = LoadError::Http {
                url: "https://app.camter.co.kr/".into(),
                status,
            };
            assert_eq!(classifier().classify(&err), LoadErrorAction::Ignored, "status {status}");
        }
    }

    #[test]
    fn server_errors_surface_with_retry() {
        let err = LoadError::Http {
            url: "https://app.camter.co.kr/".into(),
            status: 503,
        };
        let LoadErrorAction::Surface(human) = classifier().classify(&err) else {
            panic!("expected surfaced error");
        };
        assert!(human.retriable);
    }

    #[test]
    fn offline_failure_is_explained() {
        let err = LoadError::Failed {
            url: "https://app.camter.co.kr/".into(),
            description: "net::ERR_INTERNET_DISCONNECTED".into(),
        };
        let LoadErrorAction::Surface(human) = classifier().classify(&err) else {
            panic!("expected surfaced error");
        };
        assert_eq!(human.message, "You're offline.");
    }
}
