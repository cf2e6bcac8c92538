// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handler registry keyed by action name.
//
// Both bridge generations live in one capability set: the legacy picker
// actions are registered as aliases of the same image handler with a
// different source rule, not as a parallel protocol.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use camter_core::error::Result;
use camter_core::types::{Action, BridgeMessage, ImageSource};
use serde_json::Value;

use crate::dispatcher::BridgeContext;
use crate::handlers::{
    image::{ImagePickHandler, SourceRule},
    permission::CheckPermissionHandler,
    push::{GetFcmTokenHandler, NotifyLoginSuccessHandler, NotifyLogoutHandler},
    share::{ShareContentHandler, ShareKakaoHandler},
    system::{DownloadFileHandler, OpenExternalLinkHandler},
};

/// One native capability reachable from the hosted content.
///
/// `Ok(Value::Null)` means "done, nothing to report"; an `Err` becomes a
/// `success:false` response carrying the error's wire code.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value>;
}

/// Mapping from action to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Action, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// Empty registry; every action is answered with `unknown_action`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every recognised action wired to its built-in handler.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register(Action::ShowImagePicker, ImagePickHandler::new(SourceRule::AskPlatform))
            .register(Action::PickImage, ImagePickHandler::new(SourceRule::FromMessage))
            .register(
                Action::PickImageFromCamera,
                ImagePickHandler::new(SourceRule::Fixed(ImageSource::Camera)),
            )
            .register(
                Action::PickImageFromGallery,
                ImagePickHandler::new(SourceRule::Fixed(ImageSource::Gallery)),
            )
            .register(Action::CheckPermission, CheckPermissionHandler)
            .register(Action::GetFcmToken, GetFcmTokenHandler)
            .register(Action::NotifyLoginSuccess, NotifyLoginSuccessHandler)
            .register(Action::NotifyLogout, NotifyLogoutHandler)
            .register(Action::DownloadFile, DownloadFileHandler)
            .register(Action::OpenExternalLink, OpenExternalLinkHandler)
            .register(Action::ShareContent, ShareContentHandler)
            .register(Action::ShareKakao, ShareKakaoHandler);
        registry
    }

    /// Register (or replace) the handler for `action`.
    pub fn register(&mut self, action: Action, handler: impl ActionHandler + 'static) -> &mut Self {
        self.handlers.insert(action, Arc::new(handler));
        self
    }

    pub fn get(&self, action: Action) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&action).cloned()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_action() {
        let registry = HandlerRegistry::standard();
        for action in Action::ALL {
            assert!(registry.contains(action), "{action} has no handler");
        }
    }

    #[test]
    fn empty_registry_has_nothing() {
        assert!(!HandlerRegistry::new().contains(Action::PickImage));
    }
}
