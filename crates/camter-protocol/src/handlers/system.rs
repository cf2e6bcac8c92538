// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Downloads and external links. Both are best effort: platform failures are
// logged and never reported to the caller.

use async_trait::async_trait;
use camter_bridge::{NativeDownload, NativeExternalOpener};
use camter_core::error::Result;
use camter_core::types::BridgeMessage;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::dispatcher::BridgeContext;
use crate::registry::ActionHandler;

/// `downloadFile({ url, fileName })`.
pub struct DownloadFileHandler;

#[async_trait]
impl ActionHandler for DownloadFileHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let url = message.require_str("url")?.to_string();
        let file_name = message
            .data_str("fileName")
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| file_name_from_url(&url));

        info!(%url, %file_name, "starting download");
        if let Err(e) = ctx.on_platform(move |p| p.download_file(&url, &file_name)).await {
            warn!(error = %e, "download failed");
        }
        Ok(Value::Null)
    }
}

/// Last non-empty path segment of the URL, or `download` if there is none.
fn file_name_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "download".to_string())
}

/// `openExternalLink({ url })`.
pub struct OpenExternalLinkHandler;

#[async_trait]
impl ActionHandler for OpenExternalLinkHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let url = message.require_str("url")?.to_string();
        let opened = ctx
            .on_platform(move |p| {
                if p.can_open_url(&url) {
                    p.open_url(&url).map(|()| true)
                } else {
                    warn!(%url, "no handler installed for external link");
                    Ok(false)
                }
            })
            .await;
        if let Err(e) = opened {
            warn!(error = %e, "failed to open external link");
        }
        Ok(Value::Null)
    }
}
