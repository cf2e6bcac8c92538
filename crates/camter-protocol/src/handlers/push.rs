// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Push-token actions.

use async_trait::async_trait;
use camter_core::error::Result;
use camter_core::types::BridgeMessage;
use serde_json::Value;
use tracing::{info, warn};

use crate::dispatcher::BridgeContext;
use crate::registry::ActionHandler;

/// `getFcmToken()` → token string or `null`.
pub struct GetFcmTokenHandler;

#[async_trait]
impl ActionHandler for GetFcmTokenHandler {
    async fn handle(&self, ctx: &BridgeContext, _message: &BridgeMessage) -> Result<Value> {
        Ok(ctx.push.current_token().await?.map_or(Value::Null, Value::String))
    }
}

/// `notifyLoginSuccess({ accessToken })`: starts background registration and
/// returns immediately.
pub struct NotifyLoginSuccessHandler;

#[async_trait]
impl ActionHandler for NotifyLoginSuccessHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let access_token = message.require_str("accessToken")?;
        info!("login reported by web content; registering push token");
        ctx.push.spawn_registration(access_token.to_string());
        Ok(Value::Null)
    }
}

/// `notifyLogout()`: clears the cached token and the badge.
pub struct NotifyLogoutHandler;

#[async_trait]
impl ActionHandler for NotifyLogoutHandler {
    async fn handle(&self, ctx: &BridgeContext, _message: &BridgeMessage) -> Result<Value> {
        if let Err(e) = ctx.push.clear().await {
            warn!(error = %e, "failed to clear push token state on logout");
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context_with;
    use camter_bridge::{BridgeCall, SimulatedBridge};
    use camter_core::types::Action;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn token_or_null() {
        let ctx = context_with(Arc::new(SimulatedBridge::new().with_push_token(Some("t-1"))));
        let msg = BridgeMessage::new(Action::GetFcmToken);
        assert_eq!(GetFcmTokenHandler.handle(&ctx, &msg).await.unwrap(), json!("t-1"));

        let ctx = context_with(Arc::new(SimulatedBridge::new().with_push_token(None)));
        assert_eq!(GetFcmTokenHandler.handle(&ctx, &msg).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn login_without_access_token_is_rejected() {
        let ctx = context_with(Arc::new(SimulatedBridge::new()));
        let msg = BridgeMessage::new(Action::NotifyLoginSuccess);
        assert!(NotifyLoginSuccessHandler.handle(&ctx, &msg).await.is_err());
    }

    #[tokio::test]
    async fn logout_clears_cached_token() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(Some("t-2")));
        let ctx = context_with(Arc::clone(&bridge));
        ctx.push.current_token().await.unwrap();

        let value = NotifyLogoutHandler
            .handle(&ctx, &BridgeMessage::new(Action::NotifyLogout))
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(ctx.push.store().load().unwrap(), None);
        assert!(bridge.calls().contains(&BridgeCall::ClearBadge));
    }
}
