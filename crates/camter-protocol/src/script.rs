// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script snippets injected into the hosted content.

use camter_core::error::Result;
use camter_core::types::BridgeResponse;
use serde::Serialize;

/// Encode `value` as a JavaScript literal.
///
/// JSON is almost a JS subset; U+2028 and U+2029 are legal inside JSON
/// strings but terminate a line in older script engines.
pub fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029"))
}

/// Script that hands `response` to the page's global response handler.
///
/// Missing handler is a no-op: the page may not have booted its bridge yet.
pub fn response_script(handler: &str, response: &BridgeResponse) -> Result<String> {
    Ok(format!(
        "(function(){{var h=window[{name}];if(typeof h===\"function\"){{h({payload});}}}})();true;",
        name = js_literal(handler)?,
        payload = js_literal(response)?,
    ))
}

/// Script that routes the page to `path`, preferring the page's own router
/// hook and falling back to a full location change.
pub fn navigation_script(handler: &str, path: &str) -> Result<String> {
    Ok(format!(
        "(function(){{var p={path};var h=window[{name}];if(typeof h===\"function\"){{h(p);}}else{{window.location.href=p;}}}})();true;",
        path = js_literal(path)?,
        name = js_literal(handler)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_script_calls_handler() {
        let resp = BridgeResponse::ok("r1", json!({ "granted": true }));
        let script = response_script("handleNativeResponse", &resp).unwrap();
        assert_eq!(
            script,
            r#"(function(){var h=window["handleNativeResponse"];if(typeof h==="function"){h({"requestId":"r1","success":true,"data":{"granted":true}});}})();true;"#
        );
    }

    #[test]
    fn line_separators_are_escaped() {
        let resp = BridgeResponse::ok("r2", json!("a\u{2028}b\u{2029}c"));
        let script = response_script("h", &resp).unwrap();
        assert!(script.contains(r"a\u2028b\u2029c"));
        assert!(!script.contains('\u{2028}'));
    }

    #[test]
    fn quotes_in_paths_cannot_break_out() {
        let script = navigation_script("handleDeepLink", "/product/\");alert(1);//").unwrap();
        assert!(script.starts_with(r#"(function(){var p="/product/\");alert(1);//";"#));
        assert!(script.contains("window.location.href=p"));
    }
}
