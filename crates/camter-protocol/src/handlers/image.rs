// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image capture and selection.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camter_bridge::{NativeImagePicker, NativePermissions};
use camter_core::error::{CamterError, Result};
use camter_core::types::{BridgeMessage, ImagePickerResult, ImageSource, PermissionKind};
use serde_json::Value;
use tracing::{debug, info};

use crate::dispatcher::BridgeContext;
use crate::registry::ActionHandler;

/// How the handler decides between camera and gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRule {
    /// `source` must be in the message, otherwise `missing_source`.
    FromMessage,
    /// The action name fixes the source.
    Fixed(ImageSource),
    /// Let the platform show its chooser sheet (legacy `showImagePicker`).
    AskPlatform,
}

pub struct ImagePickHandler {
    rule: SourceRule,
}

impl ImagePickHandler {
    pub fn new(rule: SourceRule) -> Self {
        Self { rule }
    }

    async fn source(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<ImageSource> {
        match self.rule {
            SourceRule::Fixed(source) => Ok(source),
            SourceRule::FromMessage => message.image_source()?.ok_or(CamterError::MissingSource),
            SourceRule::AskPlatform => match message.image_source()? {
                Some(source) => Ok(source),
                None => ctx
                    .on_platform(|p| p.choose_image_source())
                    .await?
                    .ok_or(CamterError::Cancelled),
            },
        }
    }
}

fn permission_for(source: ImageSource) -> PermissionKind {
    match source {
        ImageSource::Camera => PermissionKind::Camera,
        ImageSource::Gallery => PermissionKind::Photos,
    }
}

#[async_trait]
impl ActionHandler for ImagePickHandler {
    async fn handle(&self, ctx: &BridgeContext, message: &BridgeMessage) -> Result<Value> {
        let source = self.source(ctx, message).await?;

        let kind = permission_for(source);
        let status = ctx.on_platform(move |p| p.request_permission(kind)).await?;
        if !status.is_usable() {
            info!(?kind, "image pick refused: permission not granted");
            return Err(CamterError::PermissionDenied);
        }

        let picked = ctx
            .on_platform(move |p| p.pick_image(source))
            .await?
            .ok_or(CamterError::Cancelled)?;

        debug!(
            source = source.as_str(),
            bytes = picked.bytes.len(),
            mime = %picked.mime_type,
            "image picked"
        );

        let result = ImagePickerResult {
            base64: STANDARD.encode(&picked.bytes),
            mime_type: picked.mime_type,
            file_name: picked.file_name,
            path: picked.path,
        };
        Ok(serde_json::to_value(result)?)
    }
}
