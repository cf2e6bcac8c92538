// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound bridge message dispatch.
//
// The dispatcher is re-entrant: each message is handled in its own task, so
// a picker waiting on the user never blocks the next message. Responses come
// back in completion order, correlated only by `requestId`.

use std::sync::Arc;

use camter_bridge::PlatformBridge;
use camter_core::error::{CamterError, Result};
use camter_core::types::{Action, BridgeMessage, BridgeResponse};
use tracing::{debug, info, warn};

use crate::push::PushTokenService;
use crate::registry::HandlerRegistry;

/// Everything a handler may touch.
#[derive(Clone)]
pub struct BridgeContext {
    pub platform: Arc<dyn PlatformBridge>,
    pub push: PushTokenService,
}

impl BridgeContext {
    pub fn new(platform: Arc<dyn PlatformBridge>, push: PushTokenService) -> Self {
        Self { platform, push }
    }

    /// Run a blocking platform call on the blocking pool.
    ///
    /// A panic inside the platform call surfaces as `CamterError::Bridge`.
    pub async fn on_platform<T, F>(&self, call: F) -> Result<T>
    where
        F: FnOnce(&dyn PlatformBridge) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let platform = Arc::clone(&self.platform);
        tokio::task::spawn_blocking(move || call(platform.as_ref()))
            .await
            .map_err(|e| CamterError::Bridge(format!("platform call failed: {e}")))?
    }
}

/// Routes bridge messages to their handlers.
#[derive(Clone)]
pub struct BridgeDispatcher {
    registry: Arc<HandlerRegistry>,
    ctx: BridgeContext,
}

impl BridgeDispatcher {
    pub fn new(registry: HandlerRegistry, ctx: BridgeContext) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx,
        }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.ctx
    }

    /// Decode and dispatch a raw channel payload.
    ///
    /// Malformed payloads are logged and dropped; there is no id to answer.
    pub async fn dispatch_raw(&self, raw: &str) -> Option<BridgeResponse> {
        match BridgeMessage::parse(raw) {
            Ok(message) => self.dispatch(message).await,
            Err(e) => {
                warn!(error = %e, "dropping malformed bridge message");
                None
            }
        }
    }

    /// Handle one message. Returns the response to deliver, which exists
    /// exactly when the message carried a `requestId`.
    pub async fn dispatch(&self, message: BridgeMessage) -> Option<BridgeResponse> {
        let request_id = message.request_id.clone();

        let outcome = match self.resolve_action(&message) {
            Ok(action) => self.run(action, message).await,
            Err(e) => Err(e),
        };

        match (request_id, outcome) {
            (Some(id), Ok(data)) => {
                debug!(request_id = %id, "bridge request succeeded");
                Some(BridgeResponse::ok(id, data))
            }
            (Some(id), Err(e)) => {
                warn!(request_id = %id, error = %e, "bridge request failed");
                Some(BridgeResponse::failure(id, e.to_string()))
            }
            (None, Ok(_)) => None,
            (None, Err(e)) => {
                warn!(error = %e, "fire-and-forget bridge message failed");
                None
            }
        }
    }

    fn resolve_action(&self, message: &BridgeMessage) -> Result<Action> {
        let action = message.action().inspect_err(|_| {
            warn!(action = %message.action, "ignoring unrecognised bridge action");
        })?;
        if !self.registry.contains(action) {
            warn!(%action, "no handler registered for action");
            return Err(CamterError::UnknownAction(message.action.clone()));
        }
        Ok(action)
    }

    async fn run(&self, action: Action, message: BridgeMessage) -> Result<serde_json::Value> {
        let handler = self
            .registry
            .get(action)
            .ok_or_else(|| CamterError::UnknownAction(message.action.clone()))?;
        let ctx = self.ctx.clone();

        info!(%action, request_id = ?message.request_id, "dispatching bridge message");
        tokio::spawn(async move { handler.handle(&ctx, &message).await })
            .await
            .map_err(|e| CamterError::Bridge(format!("handler for {action} aborted: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ActionHandler;
    use crate::test_support::context_with;
    use async_trait::async_trait;
    use camter_bridge::SimulatedBridge;
    use serde_json::{Value, json};

    fn dispatcher() -> BridgeDispatcher {
        BridgeDispatcher::new(
            HandlerRegistry::standard(),
            context_with(Arc::new(SimulatedBridge::new())),
        )
    }

    struct Exploding;

    #[async_trait]
    impl ActionHandler for Exploding {
        async fn handle(&self, _ctx: &BridgeContext, _message: &BridgeMessage) -> Result<Value> {
            panic!("native module crashed");
        }
    }

    #[tokio::test]
    async fn request_id_is_echoed_once() {
        let d = dispatcher();
        let msg = BridgeMessage::new(Action::CheckPermission)
            .with_request_id("req-1")
            .with_data(json!({ "type": "camera" }));

        let resp = d.dispatch(msg).await.expect("response");
        assert_eq!(resp.request_id, "req-1");
        assert!(resp.success);
        assert_eq!(
            resp.data,
            Some(json!({
                "granted": true,
                "denied": false,
                "permanentlyDenied": false,
                "limited": false
            }))
        );
    }

    #[tokio::test]
    async fn no_request_id_means_no_response() {
        let d = dispatcher();
        let msg = BridgeMessage::new(Action::CheckPermission).with_data(json!({ "type": "camera" }));
        assert!(d.dispatch(msg).await.is_none());
    }

    #[tokio::test]
    async fn unknown_action_with_id_is_answered() {
        let d = dispatcher();
        let resp = d
            .dispatch_raw(r#"{"action":"teleport","requestId":"r2"}"#)
            .await
            .expect("response");
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("unknown_action"));
    }

    #[tokio::test]
    async fn unknown_action_without_id_is_ignored() {
        let d = dispatcher();
        assert!(d.dispatch_raw(r#"{"action":"teleport"}"#).await.is_none());
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped() {
        let d = dispatcher();
        assert!(d.dispatch_raw("{\"requestId\":").await.is_none());
    }

    #[tokio::test]
    async fn panicking_handler_becomes_failure_response() {
        let mut registry = HandlerRegistry::new();
        registry.register(Action::GetFcmToken, Exploding);
        let d = BridgeDispatcher::new(registry, context_with(Arc::new(SimulatedBridge::new())));

        let resp = d
            .dispatch(BridgeMessage::new(Action::GetFcmToken).with_request_id("boom"))
            .await
            .expect("response");
        assert_eq!(resp.request_id, "boom");
        assert!(!resp.success);
        assert!(resp.error.is_some());
    }

    #[tokio::test]
    async fn unregistered_known_action_is_unknown() {
        let d = BridgeDispatcher::new(
            HandlerRegistry::new(),
            context_with(Arc::new(SimulatedBridge::new())),
        );
        let resp = d
            .dispatch(BridgeMessage::new(Action::NotifyLogout).with_request_id("r3"))
            .await
            .expect("response");
        assert_eq!(resp.error.as_deref(), Some("unknown_action"));
    }

    #[tokio::test]
    async fn invalid_permission_type_fails() {
        let d = dispatcher();
        let msg = BridgeMessage::new(Action::CheckPermission)
            .with_request_id("r4")
            .with_data(json!({ "type": "microphone" }));
        let resp = d.dispatch(msg).await.expect("response");
        assert!(!resp.success);
    }
}
