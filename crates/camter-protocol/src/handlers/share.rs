// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share sheet and Kakao share.

use async_trait::async_trait;
use camter_bridge::{KakaoFeed, NativeKakaoShare, NativeShare, ShareContent};
use camter_core::error::{CamterError, Result};
use camter_core::types::BridgeMessage;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::dispatcher::BridgeContext;
use crate::registry::ActionHandler;

/// `shareContent({ title, message, url })`. Failures are logged only.
pub struct ShareContentHandler;

#[async_trait]
impl ActionHandler for ShareContentHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let content = ShareContent {
            title: message.data_str("title").map(str::to_string),
            message: message.data_str("message").map(str::to_string),
            url: message.data_str("url").map(str::to_string),
        };
        if let Err(e) = ctx.on_platform(move |p| p.share(&content)).await {
            warn!(error = %e, "share sheet failed");
        }
        Ok(Value::Null)
    }
}

/// `shareKakao(feed)`. Falls back to the generic share sheet when the SDK
/// fails and reports `{ success }`.
pub struct ShareKakaoHandler;

#[async_trait]
impl ActionHandler for ShareKakaoHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let data = message
            .data
            .clone()
            .ok_or_else(|| CamterError::InvalidArgument("missing share parameters".into()))?;
        let feed: KakaoFeed = serde_json::from_value(data)
            .map_err(|e| CamterError::InvalidArgument(format!("share parameters: {e}")))?;

        let fallback = feed.to_share_content();
        let sdk_result = ctx.on_platform(move |p| p.share_kakao_feed(&feed)).await;

        let success = match sdk_result {
            Ok(()) => {
                info!("shared via Kakao");
                true
            }
            Err(e) => {
                warn!(error = %e, "Kakao share failed; falling back to share sheet");
                match ctx.on_platform(move |p| p.share(&fallback)).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, "fallback share sheet failed");
                        false
                    }
                }
            }
        };
        Ok(json!({ "success": success }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context_with;
    use camter_bridge::{BridgeCall, SimulatedBridge};
    use camter_core::types::Action;
    use std::sync::Arc;

    fn kakao_message() -> BridgeMessage {
        BridgeMessage::new(Action::ShareKakao)
            .with_request_id("k1")
            .with_data(json!({
                "title": "Lakeside site",
                "description": "Open for reservations",
                "mobileWebUrl": "https://m.camter.co.kr/product/5"
            }))
    }

    #[tokio::test]
    async fn kakao_share_succeeds() {
        let bridge = Arc::new(SimulatedBridge::new());
        let ctx = context_with(Arc::clone(&bridge));

        let value = ShareKakaoHandler.handle(&ctx, &kakao_message()).await.unwrap();
        assert_eq!(value, json!({ "success": true }));
        assert_eq!(bridge.calls(), vec![BridgeCall::KakaoShare("Lakeside site".into())]);
    }

    #[tokio::test]
    async fn kakao_failure_falls_back_to_share_sheet() {
        let bridge = Arc::new(SimulatedBridge::new().with_kakao_available(false));
        let ctx = context_with(Arc::clone(&bridge));

        let value = ShareKakaoHandler.handle(&ctx, &kakao_message()).await.unwrap();
        assert_eq!(value, json!({ "success": true }));
        assert_eq!(
            bridge.calls()[1],
            BridgeCall::Share(ShareContent {
                title: Some("Lakeside site".into()),
                message: Some("Open for reservations".into()),
                url: Some("https://m.camter.co.kr/product/5".into()),
            })
        );
    }

    #[tokio::test]
    async fn both_paths_failing_reports_false() {
        let bridge = Arc::new(
            SimulatedBridge::new()
                .with_kakao_available(false)
                .with_share_available(false),
        );
        let ctx = context_with(bridge);

        let value = ShareKakaoHandler.handle(&ctx, &kakao_message()).await.unwrap();
        assert_eq!(value, json!({ "success": false }));
    }

    #[tokio::test]
    async fn share_sheet_failure_is_not_reported() {
        let bridge = Arc::new(SimulatedBridge::new().with_share_available(false));
        let ctx = context_with(bridge);
        let msg = BridgeMessage::new(Action::ShareContent).with_data(json!({ "message": "hi" }));

        assert_eq!(ShareContentHandler.handle(&ctx, &msg).await.unwrap(), Value::Null);
    }
}
