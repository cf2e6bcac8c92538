// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds without a native host.
//
// Every capability reports `PlatformUnavailable`; permission checks report
// "denied" because nothing can ever be granted here.

use camter_core::error::{CamterError, Result};
use camter_core::types::{ImageSource, PermissionKind, PermissionStatus};

use crate::traits::*;

/// No-op bridge returned on platforms without a native host.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeImagePicker for StubBridge {
    fn pick_image(&self, _source: ImageSource) -> Result<Option<PickedImage>> {
        tracing::warn!("NativeImagePicker::pick_image called on stub bridge");
        Err(CamterError::PlatformUnavailable)
    }

    fn choose_image_source(&self) -> Result<Option<ImageSource>> {
        tracing::warn!("NativeImagePicker::choose_image_source called on stub bridge");
        Err(CamterError::PlatformUnavailable)
    }
}

impl NativePermissions for StubBridge {
    fn permission_status(&self, _kind: PermissionKind) -> Result<PermissionStatus> {
        Ok(PermissionStatus::denied())
    }

    fn request_permission(&self, _kind: PermissionKind) -> Result<PermissionStatus> {
        Ok(PermissionStatus::denied())
    }
}

impl NativePush for StubBridge {
    fn push_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn clear_badge(&self) -> Result<()> {
        Ok(())
    }
}

impl NativeShare for StubBridge {
    fn share(&self, _content: &ShareContent) -> Result<()> {
        tracing::warn!("NativeShare::share called on stub bridge");
        Err(CamterError::PlatformUnavailable)
    }
}

impl NativeKakaoShare for StubBridge {
    fn share_kakao_feed(&self, _feed: &KakaoFeed) -> Result<()> {
        Err(CamterError::PlatformUnavailable)
    }
}

impl NativeDownload for StubBridge {
    fn download_file(&self, _url: &str, _file_name: &str) -> Result<()> {
        tracing::warn!("NativeDownload::download_file called on stub bridge");
        Err(CamterError::PlatformUnavailable)
    }
}

impl NativeExternalOpener for StubBridge {
    fn can_open_url(&self, _url: &str) -> bool {
        false
    }

    fn open_url(&self, _url: &str) -> Result<()> {
        tracing::warn!("NativeExternalOpener::open_url called on stub bridge");
        Err(CamterError::PlatformUnavailable)
    }
}

impl NativePaymentLauncher for StubBridge {
    fn launch_payment_app(&self, _url: &str) -> Result<()> {
        Err(CamterError::PlatformUnavailable)
    }
}
