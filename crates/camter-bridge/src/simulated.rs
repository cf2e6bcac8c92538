// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulated bridge for desktop runs and tests.
//
// Behaves like a cooperative device: permissions are granted, the picker
// returns a small sample image, external URLs can be opened. Every call is
// recorded so callers can check what reached the "platform".

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use camter_core::error::{CamterError, Result};
use camter_core::types::{ImageSource, PermissionKind, PermissionStatus};
use tracing::debug;

use crate::traits::*;

/// 1x1 transparent PNG.
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// A call that reached the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    PickImage(ImageSource),
    ChooseImageSource,
    RequestPermission(PermissionKind),
    PushToken,
    ClearBadge,
    Share(ShareContent),
    KakaoShare(String),
    Download { url: String, file_name: String },
    OpenUrl(String),
    LaunchPaymentApp(String),
}

struct SimState {
    permissions: HashMap<PermissionKind, PermissionStatus>,
    images: VecDeque<Option<PickedImage>>,
    chosen_source: Option<ImageSource>,
    push_token: Option<String>,
    kakao_available: bool,
    share_available: bool,
    openable: bool,
    pick_gate: Option<Receiver<()>>,
    calls: Vec<BridgeCall>,
}

/// Scriptable in-process implementation of [`PlatformBridge`].
pub struct SimulatedBridge {
    state: Mutex<SimState>,
}

impl Default for SimulatedBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBridge {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                permissions: HashMap::new(),
                images: VecDeque::new(),
                chosen_source: Some(ImageSource::Gallery),
                push_token: Some("simulated-push-token".into()),
                kakao_available: true,
                share_available: true,
                openable: true,
                pick_gate: None,
                calls: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: BridgeCall) {
        debug!(?call, "simulated platform call");
        self.state().calls.push(call);
    }

    pub fn with_permission(self, kind: PermissionKind, status: PermissionStatus) -> Self {
        self.state().permissions.insert(kind, status);
        self
    }

    pub fn with_push_token(self, token: Option<&str>) -> Self {
        self.state().push_token = token.map(str::to_string);
        self
    }

    pub fn with_chosen_source(self, source: Option<ImageSource>) -> Self {
        self.state().chosen_source = source;
        self
    }

    pub fn with_kakao_available(self, available: bool) -> Self {
        self.state().kakao_available = available;
        self
    }

    pub fn with_share_available(self, available: bool) -> Self {
        self.state().share_available = available;
        self
    }

    pub fn with_openable(self, openable: bool) -> Self {
        self.state().openable = openable;
        self
    }

    /// Queue the next picker outcome; `None` simulates a cancelled picker.
    pub fn queue_image(&self, image: Option<PickedImage>) {
        self.state().images.push_back(image);
    }

    /// Make the next `pick_image` block until the returned sender fires or
    /// is dropped, like a user lingering in the picker.
    pub fn hold_next_pick(&self) -> Sender<()> {
        let (release, gate) = mpsc::channel();
        self.state().pick_gate = Some(gate);
        release
    }

    /// Snapshot of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state().calls.clone()
    }

    /// Sample image handed out when nothing is queued.
    pub fn sample_image(source: ImageSource) -> PickedImage {
        let file_name = match source {
            ImageSource::Camera => "capture.png",
            ImageSource::Gallery => "photo.png",
        };
        PickedImage {
            bytes: SAMPLE_PNG.to_vec(),
            mime_type: "image/png".into(),
            file_name: file_name.into(),
            path: format!("file:///tmp/{file_name}"),
        }
    }
}

impl PlatformBridge for SimulatedBridge {
    fn platform_name(&self) -> &str {
        "Simulated"
    }
}

impl NativeImagePicker for SimulatedBridge {
    fn pick_image(&self, source: ImageSource) -> Result<Option<PickedImage>> {
        self.record(BridgeCall::PickImage(source));
        let gate = self.state().pick_gate.take();
        if let Some(gate) = gate {
            debug!("picker held open");
            let _ = gate.recv();
        }
        let queued = self.state().images.pop_front();
        Ok(queued.unwrap_or_else(|| Some(Self::sample_image(source))))
    }

    fn choose_image_source(&self) -> Result<Option<ImageSource>> {
        self.record(BridgeCall::ChooseImageSource);
        Ok(self.state().chosen_source)
    }
}

impl NativePermissions for SimulatedBridge {
    fn permission_status(&self, kind: PermissionKind) -> Result<PermissionStatus> {
        Ok(self
            .state()
            .permissions
            .get(&kind)
            .copied()
            .unwrap_or_else(PermissionStatus::granted))
    }

    fn request_permission(&self, kind: PermissionKind) -> Result<PermissionStatus> {
        self.record(BridgeCall::RequestPermission(kind));
        self.permission_status(kind)
    }
}

impl NativePush for SimulatedBridge {
    fn push_token(&self) -> Result<Option<String>> {
        self.record(BridgeCall::PushToken);
        Ok(self.state().push_token.clone())
    }

    fn clear_badge(&self) -> Result<()> {
        self.record(BridgeCall::ClearBadge);
        Ok(())
    }
}

impl NativeShare for SimulatedBridge {
    fn share(&self, content: &ShareContent) -> Result<()> {
        self.record(BridgeCall::Share(content.clone()));
        if self.state().share_available {
            Ok(())
        } else {
            Err(CamterError::Bridge("share sheet unavailable".into()))
        }
    }
}

impl NativeKakaoShare for SimulatedBridge {
    fn share_kakao_feed(&self, feed: &KakaoFeed) -> Result<()> {
        self.record(BridgeCall::KakaoShare(feed.title.clone()));
        if self.state().kakao_available {
            Ok(())
        } else {
            Err(CamterError::Bridge("KakaoTalk is not installed".into()))
        }
    }
}

impl NativeDownload for SimulatedBridge {
    fn download_file(&self, url: &str, file_name: &str) -> Result<()> {
        self.record(BridgeCall::Download {
            url: url.to_string(),
            file_name: file_name.to_string(),
        });
        Ok(())
    }
}

impl NativeExternalOpener for SimulatedBridge {
    fn can_open_url(&self, _url: &str) -> bool {
        self.state().openable
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.record(BridgeCall::OpenUrl(url.to_string()));
        Ok(())
    }
}

impl NativePaymentLauncher for SimulatedBridge {
    fn launch_payment_app(&self, url: &str) -> Result<()> {
        self.record(BridgeCall::LaunchPaymentApp(url.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_images_are_returned_in_order() {
        let bridge = SimulatedBridge::new();
        bridge.queue_image(None);

        assert!(bridge.pick_image(ImageSource::Camera).unwrap().is_none());
        let next = bridge.pick_image(ImageSource::Gallery).unwrap().expect("sample");
        assert_eq!(next.mime_type, "image/png");
        assert_eq!(
            bridge.calls(),
            vec![
                BridgeCall::PickImage(ImageSource::Camera),
                BridgeCall::PickImage(ImageSource::Gallery),
            ]
        );
    }

    #[test]
    fn held_picker_waits_for_release() {
        let bridge = std::sync::Arc::new(SimulatedBridge::new());
        let release = bridge.hold_next_pick();

        let picker = {
            let bridge = std::sync::Arc::clone(&bridge);
            std::thread::spawn(move || bridge.pick_image(ImageSource::Camera))
        };
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(!picker.is_finished());

        release.send(()).unwrap();
        assert!(picker.join().unwrap().unwrap().is_some());
        // The hold only applies once.
        assert!(bridge.pick_image(ImageSource::Gallery).unwrap().is_some());
    }

    #[test]
    fn permissions_default_to_granted() {
        let bridge = SimulatedBridge::new()
            .with_permission(PermissionKind::Photos, PermissionStatus::limited());
        assert_eq!(
            bridge.permission_status(PermissionKind::Camera).unwrap(),
            PermissionStatus::granted()
        );
        assert!(bridge.permission_status(PermissionKind::Photos).unwrap().limited);
    }
}
