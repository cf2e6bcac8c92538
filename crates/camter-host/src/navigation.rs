// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Navigation interception.
//
// Every navigation attempted inside the WebView passes through
// `NavigationPolicy::evaluate`. Rules are checked in a fixed order and the
// first one that matches decides.

use std::collections::BTreeMap;

use camter_core::ShellConfig;
use tracing::debug;
use url::Url;

/// Payment and bank app schemes used by Korean card/PG checkout flows.
const PAYMENT_APP_SCHEMES: &[&str] = &[
    "ispmobile",
    "kftc-bankpay",
    "hdcardappcardansimclick",
    "smhyundaiansimclick",
    "shinhan-sr-ansimclick",
    "smshinhanansimclick",
    "kb-acp",
    "kbbank",
    "liivbank",
    "mpocket.online.ansimclick",
    "lottesmartpay",
    "lotteappcard",
    "cloudpay",
    "nhappcardansimclick",
    "nonghyupcardansimclick",
    "citispay",
    "citicardappkr",
    "payco",
    "samsungpay",
    "supertoss",
    "kakaopay",
    "naverpay",
];

const SOCIAL_APP_SCHEMES: &[&str] = &["kakaolink", "kakaotalk", "kakaoplus", "storylink"];

const STORE_SCHEMES: &[&str] = &["market", "itms-apps", "itms-appss", "itms-services"];

const SYSTEM_SCHEMES: &[&str] = &["tel", "mailto", "sms"];

/// A navigation the WebView is about to perform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationRequest {
    pub url: String,
    /// Extra request headers already attached to this load.
    pub headers: BTreeMap<String, String>,
}

impl NavigationRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }
}

/// What the container does with a navigation. Anything but `Allow` cancels
/// the WebView load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// Reissue the load with these headers attached.
    ReloadWithHeaders {
        url: String,
        headers: BTreeMap<String, String>,
    },
    /// Hand an `intent:` URL to the payment SDK.
    LaunchPaymentApp(String),
    /// Open with the platform's external URL handler.
    OpenExternally(String),
}

impl NavigationDecision {
    pub fn cancels_load(&self) -> bool {
        !matches!(self, Self::Allow)
    }
}

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    oauth_prefix: String,
    header_name: String,
    header_value: String,
    kakao_schemes: Vec<String>,
}

impl NavigationPolicy {
    pub fn new(config: &ShellConfig) -> Self {
        let kakao_schemes = config
            .kakao_native_app_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|key| {
                let key = key.to_ascii_lowercase();
                vec![format!("kakao{key}"), format!("kakao{key}_oauth")]
            })
            .unwrap_or_default();
        Self {
            oauth_prefix: config.oauth_authorize_prefix.clone(),
            header_name: config.origin_header_name.clone(),
            header_value: config.origin_header_value.clone(),
            kakao_schemes,
        }
    }

    pub fn evaluate(&self, request: &NavigationRequest) -> NavigationDecision {
        let url = request.url.as_str();

        if !self.oauth_prefix.is_empty()
            && url.starts_with(&self.oauth_prefix)
            && !request.has_header(&self.header_name)
        {
            let mut headers = request.headers.clone();
            headers.insert(self.header_name.clone(), self.header_value.clone());
            debug!(%url, "reissuing OAuth authorization load with origin header");
            return NavigationDecision::ReloadWithHeaders {
                url: url.to_string(),
                headers,
            };
        }

        let Some(scheme) = scheme_of(url) else {
            return NavigationDecision::Allow;
        };

        if scheme == "intent" {
            return NavigationDecision::LaunchPaymentApp(url.to_string());
        }

        if self.is_external_scheme(&scheme) {
            return NavigationDecision::OpenExternally(url.to_string());
        }

        NavigationDecision::Allow
    }

    fn is_external_scheme(&self, scheme: &str) -> bool {
        [PAYMENT_APP_SCHEMES, SOCIAL_APP_SCHEMES, STORE_SCHEMES, SYSTEM_SCHEMES]
            .iter()
            .any(|list| list.contains(&scheme))
            || self.kakao_schemes.iter().any(|s| s == scheme)
    }
}

/// Scheme of an absolute URL. `Url` lower-cases it and accepts opaque forms
/// such as `tel:010-1234-5678`.
fn scheme_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.scheme().to_owned())
}
