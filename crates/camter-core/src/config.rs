// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Persistent shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    /// Remote web application loaded into the WebView.
    pub web_url: String,
    /// Custom URI schemes accepted as deep links (development tooling included).
    pub deep_link_schemes: Vec<String>,
    /// Kakao native app key; enables the `kakao{key}` OAuth-callback schemes.
    pub kakao_native_app_key: Option<String>,
    /// Hosts whose `https` URLs are accepted as universal links.
    pub universal_link_hosts: Vec<String>,
    /// Prefix of the backend's OAuth authorization endpoint.
    pub oauth_authorize_prefix: String,
    /// Header identifying requests that originate from the app shell.
    pub origin_header_name: String,
    pub origin_header_value: String,
    /// Delay between load completion and opening the delivery gate.
    pub settle_delay_ms: u64,
    /// Upper bound of the outbound script queue (oldest entries are dropped).
    pub max_queued_messages: usize,
    /// Web-side timeout for a pending bridge call.
    pub request_timeout_ms: u64,
    /// Endpoint receiving `{ token, platform }` after login.
    pub token_registration_url: String,
    /// Hosts of third-party payment widgets whose load errors are filtered.
    pub payment_widget_hosts: Vec<String>,
    /// Global JS function receiving bridge responses.
    pub response_handler: String,
    /// Global JS function receiving deep-link navigation paths.
    pub navigation_handler: String,
}

impl ShellConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Every scheme the deep-link resolver accepts, including the Kakao
    /// callback variants derived from the native app key.
    pub fn accepted_schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self
            .deep_link_schemes
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if let Some(key) = self.kakao_native_app_key.as_deref().filter(|k| !k.is_empty()) {
            let key = key.to_ascii_lowercase();
            schemes.push(format!("kakao{key}"));
            schemes.push(format!("kakao{key}_oauth"));
        }
        schemes
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            web_url: "https://app.camter.co.kr".into(),
            deep_link_schemes: vec!["camterapp".into(), "exp".into()],
            kakao_native_app_key: None,
            universal_link_hosts: vec!["app.camter.co.kr".into()],
            oauth_authorize_prefix: "https://api.camter.co.kr/oauth2/authorization".into(),
            origin_header_name: "X-Client-Origin".into(),
            origin_header_value: "camter-app".into(),
            settle_delay_ms: 300,
            max_queued_messages: 256,
            request_timeout_ms: 30_000,
            token_registration_url: "https://api.camter.co.kr/api/v1/push/tokens".into(),
            payment_widget_hosts: vec![
                "tosspayments.com".into(),
                "portone.io".into(),
                "iamport.kr".into(),
            ],
            response_handler: "handleNativeResponse".into(),
            navigation_handler: "handleDeepLink".into(),
        }
    }
}
