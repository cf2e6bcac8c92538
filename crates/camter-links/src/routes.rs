// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parameter-to-path routing rules.
//
// The precedence order of `ID_ROUTES` is part of the app's navigation
// contract: when several identifiers are present, the first one listed wins.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Semantic identifiers and the path prefix each one routes to, in
/// precedence order.
pub const ID_ROUTES: [(&str, &str); 5] = [
    ("productId", "/product/"),
    ("eventId", "/event/"),
    ("programId", "/program/"),
    ("postId", "/community/post/"),
    ("reservationId", "/reservation-detail/"),
];

/// Named screen, checked after the identifiers.
pub const SCREEN_PARAM: &str = "screen";

pub const OAUTH_CALLBACK_PATH: &str = "/oauth/callback";

/// Resolve parsed query parameters (and the URL path as a fallback) into an
/// in-app path.
pub fn resolve_path(params: &BTreeMap<String, String>, fallback_path: &str) -> String {
    let value = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());

    for (param, prefix) in ID_ROUTES {
        if let Some(id) = value(param) {
            return format!("{prefix}{}", encode_segment(id));
        }
    }

    if let Some(screen) = value(SCREEN_PARAM) {
        let screen = screen.trim_start_matches('/');
        if !screen.is_empty() {
            return format!("/{screen}");
        }
    }

    if let Some(code) = value("code") {
        return oauth_callback(&[("code", Some(code)), ("state", value("state"))]);
    }

    if let Some(error) = value("error") {
        return oauth_callback(&[("error", Some(error)), ("state", value("state"))]);
    }

    normalize_path(fallback_path)
}

fn oauth_callback(pairs: &[(&str, Option<&str>)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        if let Some(value) = value {
            query.append_pair(key, value);
        }
    }
    format!("{OAUTH_CALLBACK_PATH}?{}", query.finish())
}

fn encode_segment(id: &str) -> String {
    form_urlencoded::byte_serialize(id.as_bytes()).collect()
}

/// Root-anchored path with no trailing slash; empty becomes `/`.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
