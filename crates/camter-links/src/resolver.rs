// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deep link resolver.
//
// Each activation walks Unseen -> Parsed -> Resolved; the host container
// moves it to Delivered once the navigation script has been injected.
// Unsupported schemes and repeats end in Ignored. The seen-set only grows
// for activations that passed the scheme check.

use std::collections::{BTreeMap, HashSet};

use camter_core::ShellConfig;
use camter_core::types::{DeepLinkActivation, LinkState};
use tracing::{debug, info, warn};
use url::Url;

use crate::routes::resolve_path;

/// Scheme recorded on activations that come from a notification tap.
pub const NOTIFICATION_SCHEME: &str = "notification";

/// Expo development URLs prefix the app path with this segment.
const DEV_PATH_PREFIX: &str = "/--";

/// Why an activation produced no navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnsupportedScheme(String),
    Duplicate,
    Unparseable(String),
}

/// Outcome of resolving one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Navigate(DeepLinkActivation),
    Ignored(IgnoreReason),
}

impl Resolution {
    /// The resolved in-app path, if navigation should happen.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Navigate(activation) => activation.resolved_path.as_deref(),
            Self::Ignored(_) => None,
        }
    }
}

/// Resolves raw activations and remembers which ones were already handled.
pub struct DeepLinkResolver {
    schemes: Vec<String>,
    universal_link_hosts: Vec<String>,
    seen: HashSet<String>,
}

impl DeepLinkResolver {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            schemes: config.accepted_schemes(),
            universal_link_hosts: config
                .universal_link_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            seen: HashSet::new(),
        }
    }

    /// Number of distinct activations processed so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, raw_url: &str) -> bool {
        self.seen.contains(raw_url)
    }

    /// Resolve an OS-delivered URL.
    pub fn resolve(&mut self, raw_url: &str) -> Resolution {
        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = raw_url, error = %e, "ignoring unparseable deep link");
                return Resolution::Ignored(IgnoreReason::Unparseable(e.to_string()));
            }
        };

        if !self.accepts(&url) {
            warn!(url = raw_url, scheme = url.scheme(), "ignoring deep link with unsupported scheme");
            return Resolution::Ignored(IgnoreReason::UnsupportedScheme(url.scheme().to_string()));
        }

        if !self.seen.insert(raw_url.to_string()) {
            debug!(url = raw_url, "ignoring repeated deep link");
            return Resolution::Ignored(IgnoreReason::Duplicate);
        }

        let mut activation = DeepLinkActivation::new(raw_url);
        activation.scheme = url.scheme().to_string();
        for (key, value) in url.query_pairs() {
            activation
                .params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        activation.state = LinkState::Parsed;

        let path = url.path();
        let path = path.strip_prefix(DEV_PATH_PREFIX).unwrap_or(path);
        let resolved = resolve_path(&activation.params, path);

        info!(url = raw_url, path = %resolved, "deep link resolved");
        activation.resolved_path = Some(resolved);
        activation.state = LinkState::Resolved;
        Resolution::Navigate(activation)
    }

    /// Resolve the data payload of a tapped push notification.
    ///
    /// A `url` or `link` entry is treated as a regular deep link. Otherwise
    /// the payload itself is routed by parameter precedence; payloads with a
    /// `notificationId` (or `id`) are deduplicated on that id.
    pub fn resolve_notification(&mut self, payload: &BTreeMap<String, String>) -> Resolution {
        if let Some(link) = payload.get("url").or_else(|| payload.get("link")) {
            return self.resolve(link);
        }

        let id = payload.get("notificationId").or_else(|| payload.get("id"));
        let raw_url = match id {
            Some(id) => format!("{NOTIFICATION_SCHEME}:{id}"),
            None => format!("{NOTIFICATION_SCHEME}:"),
        };

        if id.is_some() && !self.seen.insert(raw_url.clone()) {
            debug!(key = %raw_url, "ignoring repeated notification activation");
            return Resolution::Ignored(IgnoreReason::Duplicate);
        }

        let mut activation = DeepLinkActivation::new(raw_url);
        activation.scheme = NOTIFICATION_SCHEME.to_string();
        activation.params = payload.clone();
        activation.state = LinkState::Parsed;

        let resolved = resolve_path(&activation.params, "/");
        info!(path = %resolved, "notification activation resolved");
        activation.resolved_path = Some(resolved);
        activation.state = LinkState::Resolved;
        Resolution::Navigate(activation)
    }

    fn accepts(&self, url: &Url) -> bool {
        let scheme = url.scheme().to_ascii_lowercase();
        if self.schemes.contains(&scheme) {
            return true;
        }
        scheme == "https"
            && url
                .host_str()
                .is_some_and(|host| self.universal_link_hosts.iter().any(|h| h == host))
    }
}
