// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the protocol unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use camter_bridge::{PlatformBridge, SimulatedBridge, SqliteKeyValueStore};
use camter_core::error::{CamterError, Result};

use crate::dispatcher::BridgeContext;
use crate::push::{PushTokenService, TokenRegistrar, TokenStore};

/// Registrar that remembers what it was asked to register.
#[derive(Default)]
pub struct RecordingRegistrar {
    registrations: Mutex<Vec<(String, String)>>,
    fail_next: AtomicBool,
}

impl RecordingRegistrar {
    pub fn registrations(&self) -> Vec<(String, String)> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenRegistrar for RecordingRegistrar {
    async fn register(&self, push_token: &str, access_token: &str) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CamterError::Network("503 Service Unavailable".into()));
        }
        self.registrations
            .lock()
            .unwrap()
            .push((push_token.to_string(), access_token.to_string()));
        Ok(())
    }
}

pub fn push_service_with(
    bridge: Arc<SimulatedBridge>,
) -> (PushTokenService, Arc<RecordingRegistrar>) {
    let store = TokenStore::new(Arc::new(
        SqliteKeyValueStore::open_in_memory().expect("open in-memory db"),
    ));
    let registrar = Arc::new(RecordingRegistrar::default());
    let platform: Arc<dyn PlatformBridge> = bridge;
    let service = PushTokenService::new(platform, store, registrar.clone());
    (service, registrar)
}

pub fn context_with(bridge: Arc<SimulatedBridge>) -> BridgeContext {
    let platform: Arc<dyn PlatformBridge> = bridge.clone();
    let (push, _) = push_service_with(bridge);
    BridgeContext::new(platform, push)
}
