// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only permission queries.

use async_trait::async_trait;
use camter_bridge::NativePermissions;
use camter_core::error::Result;
use camter_core::types::{BridgeMessage, PermissionKind};
use serde_json::Value;

use crate::dispatcher::BridgeContext;
use crate::registry::ActionHandler;

/// `checkPermission({ type: "camera" | "photos" })`. Never prompts.
pub struct CheckPermissionHandler;

#[async_trait]
impl ActionHandler for CheckPermissionHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let kind: PermissionKind = message.require_str("type")?.parse()?;
        let status = ctx.on_platform(move |p| p.permission_status(kind)).await?;
        Ok(serde_json::to_value(status)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context_with;
    use camter_bridge::SimulatedBridge;
    use camter_core::error::CamterError;
    use camter_core::types::{Action, PermissionStatus};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn granted_camera() {
        let ctx = context_with(Arc::new(SimulatedBridge::new()));
        let msg = BridgeMessage::new(Action::CheckPermission).with_data(json!({ "type": "camera" }));

        let value = CheckPermissionHandler.handle(&ctx, &msg).await.unwrap();
        assert_eq!(
            value,
            json!({ "granted": true, "denied": false, "permanentlyDenied": false, "limited": false })
        );
    }

    #[tokio::test]
    async fn permanently_denied_photos() {
        let bridge = SimulatedBridge::new()
            .with_permission(PermissionKind::Photos, PermissionStatus::permanently_denied());
        let ctx = context_with(Arc::new(bridge));
        let msg = BridgeMessage::new(Action::CheckPermission).with_data(json!({ "type": "photos" }));

        let value = CheckPermissionHandler.handle(&ctx, &msg).await.unwrap();
        assert_eq!(value["permanentlyDenied"], true);
        assert_eq!(value["granted"], false);
    }

    #[tokio::test]
    async fn missing_type_is_invalid() {
        let ctx = context_with(Arc::new(SimulatedBridge::new()));
        let msg = BridgeMessage::new(Action::CheckPermission);
        let err = CheckPermissionHandler.handle(&ctx, &msg).await.unwrap_err();
        assert!(matches!(err, CamterError::InvalidArgument(_)));
    }
}
