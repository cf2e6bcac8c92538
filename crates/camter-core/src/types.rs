// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Camter shell: the bridge envelope exchanged with
// the hosted web content and the deep-link activation record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CamterError, Result};

/// Named operation carried by a bridge message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Legacy: let the platform present a camera/gallery chooser.
    ShowImagePicker,
    PickImage,
    PickImageFromCamera,
    PickImageFromGallery,
    CheckPermission,
    GetFcmToken,
    NotifyLoginSuccess,
    NotifyLogout,
    DownloadFile,
    OpenExternalLink,
    ShareContent,
    ShareKakao,
}

impl Action {
    /// Every recognised action, in wire-enumeration order.
    pub const ALL: [Action; 12] = [
        Self::ShowImagePicker,
        Self::PickImage,
        Self::PickImageFromCamera,
        Self::PickImageFromGallery,
        Self::CheckPermission,
        Self::GetFcmToken,
        Self::NotifyLoginSuccess,
        Self::NotifyLogout,
        Self::DownloadFile,
        Self::OpenExternalLink,
        Self::ShareContent,
        Self::ShareKakao,
    ];

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowImagePicker => "showImagePicker",
            Self::PickImage => "pickImage",
            Self::PickImageFromCamera => "pickImageFromCamera",
            Self::PickImageFromGallery => "pickImageFromGallery",
            Self::CheckPermission => "checkPermission",
            Self::GetFcmToken => "getFcmToken",
            Self::NotifyLoginSuccess => "notifyLoginSuccess",
            Self::NotifyLogout => "notifyLogout",
            Self::DownloadFile => "downloadFile",
            Self::OpenExternalLink => "openExternalLink",
            Self::ShareContent => "shareContent",
            Self::ShareKakao => "shareKakao",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CamterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CamterError::UnknownAction(s.to_string()))
    }
}

/// Where an image should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Camera,
    Gallery,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Gallery => "gallery",
        }
    }
}

impl FromStr for ImageSource {
    type Err = CamterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "camera" => Ok(Self::Camera),
            "gallery" => Ok(Self::Gallery),
            other => Err(CamterError::InvalidArgument(format!("unknown image source: {other}"))),
        }
    }
}

/// Permission classes the hosted content may query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Camera,
    Photos,
}

impl FromStr for PermissionKind {
    type Err = CamterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "camera" => Ok(Self::Camera),
            "photos" => Ok(Self::Photos),
            other => Err(CamterError::InvalidArgument(format!("unknown permission type: {other}"))),
        }
    }
}

/// Snapshot of one permission as reported to the hosted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStatus {
    pub granted: bool,
    pub denied: bool,
    pub permanently_denied: bool,
    /// iOS "selected photos" access.
    pub limited: bool,
}

impl PermissionStatus {
    pub fn granted() -> Self {
        Self { granted: true, ..Self::default() }
    }

    pub fn denied() -> Self {
        Self { denied: true, ..Self::default() }
    }

    pub fn permanently_denied() -> Self {
        Self { denied: true, permanently_denied: true, ..Self::default() }
    }

    pub fn limited() -> Self {
        Self { granted: true, limited: true, ..Self::default() }
    }

    /// Whether the capability may be used right now (full or limited access).
    pub fn is_usable(&self) -> bool {
        self.granted || self.limited
    }
}

/// Payload returned by the image-pick actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePickerResult {
    pub base64: String,
    pub mime_type: String,
    pub file_name: String,
    pub path: String,
}

/// Request sent from the hosted content to native code.
///
/// `action` stays a plain string on the wire so that an unrecognised action
/// still parses and can be answered instead of being dropped as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl BridgeMessage {
    /// Build a message for a known action.
    pub fn new(action: Action) -> Self {
        Self {
            action: action.as_str().to_string(),
            request_id: None,
            data: None,
            source: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.source = Some(source.as_str().to_string());
        self
    }

    /// Decode a message from the WebView message channel.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CamterError::MalformedMessage(e.to_string()))
    }

    /// The typed action, if recognised.
    pub fn action(&self) -> Result<Action> {
        self.action.parse()
    }

    /// A string field from `data`, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// A string field from `data` that must be present and non-empty.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.data_str(key) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(CamterError::InvalidArgument(format!("missing `{key}`"))),
        }
    }

    /// Requested image source. The top-level field wins over `data.source`.
    pub fn image_source(&self) -> Result<Option<ImageSource>> {
        self.source
            .as_deref()
            .or_else(|| self.data_str("source"))
            .map(str::parse)
            .transpose()
    }
}

/// Native reply to a `BridgeMessage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok(request_id: impl Into<String>, data: Value) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Lifecycle of a single deep-link activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Unseen,
    Parsed,
    Resolved,
    Delivered,
    /// Terminal: unsupported scheme or already processed.
    Ignored,
}

/// A URI presented by the OS (custom scheme, universal link or notification).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepLinkActivation {
    pub raw_url: String,
    pub scheme: String,
    pub params: BTreeMap<String, String>,
    pub resolved_path: Option<String>,
    pub state: LinkState,
}

impl DeepLinkActivation {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
            scheme: String::new(),
            params: BTreeMap::new(),
            resolved_path: None,
            state: LinkState::Unseen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_action_parses_from_its_wire_name() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!(matches!(
            "teleport".parse::<Action>(),
            Err(CamterError::UnknownAction(_))
        ));
    }

    #[test]
    fn parse_message_with_unknown_action_still_succeeds() {
        let msg = BridgeMessage::parse(r#"{"action":"teleport","requestId":"r1"}"#).unwrap();
        assert_eq!(msg.request_id.as_deref(), Some("r1"));
        assert!(msg.action().is_err());
    }

    #[test]
    fn malformed_message_is_transport_error() {
        let err = BridgeMessage::parse("{not json").unwrap_err();
        assert!(matches!(err, CamterError::MalformedMessage(_)));
    }

    #[test]
    fn image_source_prefers_top_level_field() {
        let msg = BridgeMessage::new(Action::PickImage)
            .with_source(ImageSource::Camera)
            .with_data(json!({ "source": "gallery" }));
        assert_eq!(msg.image_source().unwrap(), Some(ImageSource::Camera));

        let msg = BridgeMessage::new(Action::PickImage).with_data(json!({ "source": "gallery" }));
        assert_eq!(msg.image_source().unwrap(), Some(ImageSource::Gallery));

        let msg = BridgeMessage::new(Action::PickImage);
        assert_eq!(msg.image_source().unwrap(), None);
    }

    #[test]
    fn require_str_rejects_empty_values() {
        let msg = BridgeMessage::new(Action::DownloadFile).with_data(json!({ "url": "" }));
        assert!(msg.require_str("url").is_err());
        assert!(msg.require_str("fileName").is_err());
    }

    #[test]
    fn permission_status_wire_shape() {
        let value = serde_json::to_value(PermissionStatus::granted()).unwrap();
        assert_eq!(
            value,
            json!({ "granted": true, "denied": false, "permanentlyDenied": false, "limited": false })
        );
    }

    #[test]
    fn failure_response_omits_data() {
        let value = serde_json::to_value(BridgeResponse::failure("r9", "cancelled")).unwrap();
        assert_eq!(value, json!({ "requestId": "r9", "success": false, "error": "cancelled" }));
    }
}
