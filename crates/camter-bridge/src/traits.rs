// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// All methods are synchronous: pickers and permission prompts block the
// calling thread until the user is done. The protocol dispatcher runs them on
// the blocking pool so one open picker never stalls other bridge messages.

use camter_core::error::Result;
use camter_core::types::{ImageSource, PermissionKind, PermissionStatus};
use serde::{Deserialize, Serialize};

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge:
    NativeImagePicker
    + NativePermissions
    + NativePush
    + NativeShare
    + NativeKakaoShare
    + NativeDownload
    + NativeExternalOpener
    + NativePaymentLauncher
    + Send
    + Sync
{
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Camera capture and photo-library selection.
pub trait NativeImagePicker {
    /// Capture or pick one image. Returns `Ok(None)` if the user cancelled.
    fn pick_image(&self, source: ImageSource) -> Result<Option<PickedImage>>;

    /// Present the platform's camera/gallery action sheet.
    /// Returns `Ok(None)` if the sheet was dismissed.
    fn choose_image_source(&self) -> Result<Option<ImageSource>>;
}

/// Runtime permission state.
pub trait NativePermissions {
    /// Read the current state without prompting.
    fn permission_status(&self, kind: PermissionKind) -> Result<PermissionStatus>;

    /// Prompt the user if the permission is still undetermined, then return
    /// the resulting state.
    fn request_permission(&self, kind: PermissionKind) -> Result<PermissionStatus>;
}

/// Push-notification token and badge handling.
pub trait NativePush {
    /// Current device push token. `Ok(None)` on simulators or before the
    /// notification permission has been granted.
    fn push_token(&self) -> Result<Option<String>>;

    /// Reset the app icon badge count.
    fn clear_badge(&self) -> Result<()>;
}

/// The OS share sheet.
pub trait NativeShare {
    fn share(&self, content: &ShareContent) -> Result<()>;
}

/// Kakao share SDK (feed template).
pub trait NativeKakaoShare {
    fn share_kakao_feed(&self, feed: &KakaoFeed) -> Result<()>;
}

/// Platform download manager.
pub trait NativeDownload {
    /// Start downloading `url` into the user's downloads as `file_name`.
    fn download_file(&self, url: &str, file_name: &str) -> Result<()>;
}

/// Hand-off of URLs the WebView must not load itself.
pub trait NativeExternalOpener {
    /// Whether any installed app can handle the URL.
    fn can_open_url(&self, url: &str) -> bool;

    /// Open the URL in its external handler.
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Payment SDK app-launch routine for `intent:` URLs.
pub trait NativePaymentLauncher {
    fn launch_payment_app(&self, url: &str) -> Result<()>;
}

/// Small string key-value store (SharedPreferences / UserDefaults).
pub trait NativeKeyValueStore: Send + Sync {
    fn get_value(&self, key: &str) -> Result<Option<String>>;

    fn set_value(&self, key: &str, value: &str) -> Result<()>;

    fn remove_value(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Payload structs
// ---------------------------------------------------------------------------

/// Raw image returned by the platform picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    /// Local file URI of the image.
    pub path: String,
}

/// Arguments of the generic share sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareContent {
    pub title: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
}

/// Kakao feed template arguments as sent by the hosted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KakaoFeed {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub web_url: Option<String>,
    pub mobile_web_url: Option<String>,
    pub button_title: Option<String>,
}

impl KakaoFeed {
    /// Best link for the feed, preferring the mobile URL.
    pub fn link(&self) -> Option<&str> {
        self.mobile_web_url.as_deref().or(self.web_url.as_deref())
    }

    /// Equivalent generic share-sheet content, used when the SDK fails.
    pub fn to_share_content(&self) -> ShareContent {
        ShareContent {
            title: Some(self.title.clone()),
            message: self.description.clone(),
            url: self.link().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kakao_fallback_prefers_mobile_link() {
        let feed = KakaoFeed {
            title: "Spring camp".into(),
            description: Some("Three days by the lake".into()),
            web_url: Some("https://camter.co.kr/p/1".into()),
            mobile_web_url: Some("https://m.camter.co.kr/p/1".into()),
            ..KakaoFeed::default()
        };
        let share = feed.to_share_content();
        assert_eq!(share.title.as_deref(), Some("Spring camp"));
        assert_eq!(share.url.as_deref(), Some("https://m.camter.co.kr/p/1"));
    }
}
