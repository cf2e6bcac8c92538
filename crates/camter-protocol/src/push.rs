// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Push-token caching and server-side registration.
//
// The only state the shell persists is the last push token seen, kept under
// one fixed key. After a web login the token is sent to the backend together
// with the caller's access token; logout clears the cache and the badge.

use std::sync::Arc;

use async_trait::async_trait;
use camter_bridge::{NativeKeyValueStore, NativePush, PlatformBridge};
use camter_core::error::{CamterError, Result};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

/// Storage key of the cached push token.
pub const PUSH_TOKEN_KEY: &str = "camter.fcmToken";

/// Cached push token on top of the platform key-value store.
#[derive(Clone)]
pub struct TokenStore {
    kv: Arc<dyn NativeKeyValueStore>,
}

impl TokenStore {
    pub fn new(kv: Arc<dyn NativeKeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn load(&self) -> Result<Option<String>> {
        self.kv.get_value(PUSH_TOKEN_KEY)
    }

    pub fn save(&self, token: &str) -> Result<()> {
        self.kv.set_value(PUSH_TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        self.kv.remove_value(PUSH_TOKEN_KEY)
    }
}

/// Backend endpoint that associates a push token with a signed-in user.
#[async_trait]
pub trait TokenRegistrar: Send + Sync {
    async fn register(&self, push_token: &str, access_token: &str) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterTokenBody<'a> {
    token: &'a str,
    platform: &'a str,
}

/// `TokenRegistrar` posting JSON to the configured URL with bearer auth.
pub struct HttpTokenRegistrar {
    endpoint: String,
    platform: String,
    client: reqwest::Client,
}

impl HttpTokenRegistrar {
    pub fn new(endpoint: &str, platform: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            platform: platform.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TokenRegistrar for HttpTokenRegistrar {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn register(&self, push_token: &str, access_token: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(access_token)
            .json(&RegisterTokenBody {
                token: push_token,
                platform: &self.platform,
            })
            .send()
            .await
            .map_err(|e| CamterError::Network(format!("token registration request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CamterError::Network(format!(
                "token registration rejected ({status}): {text}"
            )));
        }

        info!("push token registered");
        Ok(())
    }
}

/// Push-token workflows behind the `getFcmToken`, `notifyLoginSuccess` and
/// `notifyLogout` actions.
#[derive(Clone)]
pub struct PushTokenService {
    platform: Arc<dyn PlatformBridge>,
    store: TokenStore,
    registrar: Arc<dyn TokenRegistrar>,
}

impl PushTokenService {
    pub fn new(
        platform: Arc<dyn PlatformBridge>,
        store: TokenStore,
        registrar: Arc<dyn TokenRegistrar>,
    ) -> Self {
        Self {
            platform,
            store,
            registrar,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Ask the platform for the current token and refresh the cache.
    ///
    /// `None` when the device cannot receive pushes; a stale cached value is
    /// never served in that case.
    pub async fn current_token(&self) -> Result<Option<String>> {
        let platform = Arc::clone(&self.platform);
        let token = tokio::task::spawn_blocking(move || platform.push_token())
            .await
            .map_err(|e| CamterError::Bridge(format!("push token lookup failed: {e}")))??;

        match token.as_deref() {
            Some(t) => {
                if self.store.load()?.as_deref() != Some(t) {
                    self.store.save(t)?;
                    debug!("cached push token updated");
                }
            }
            None => debug!("no push token available on this device"),
        }
        Ok(token)
    }

    /// Fetch the push token and register it for the signed-in user.
    pub async fn register_after_login(&self, access_token: &str) -> Result<()> {
        let Some(token) = self.current_token().await? else {
            info!("skipping push token registration: no token on this device");
            return Ok(());
        };
        self.registrar.register(&token, access_token).await
    }

    /// Fire-and-forget variant of [`register_after_login`](Self::register_after_login).
    /// Failures are logged and never reported back.
    pub fn spawn_registration(&self, access_token: String) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.register_after_login(&access_token).await {
                error!(error = %e, "push token registration failed");
            }
        })
    }

    /// Forget the cached token and reset the badge count.
    ///
    /// Both steps always run; the first failure is returned.
    pub async fn clear(&self) -> Result<()> {
        let stored = self.store.clear();
        let platform = Arc::clone(&self.platform);
        let badge = tokio::task::spawn_blocking(move || platform.clear_badge())
            .await
            .map_err(|e| CamterError::Bridge(format!("badge reset failed: {e}")))
            .and_then(|r| r);
        stored.and(badge)?;
        info!("push token state cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::push_service_with;
    use camter_bridge::{BridgeCall, SimulatedBridge};

    #[tokio::test]
    async fn current_token_refreshes_cache() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(Some("tok-1")));
        let (service, _) = push_service_with(bridge);

        assert_eq!(service.current_token().await.unwrap().as_deref(), Some("tok-1"));
        assert_eq!(service.store().load().unwrap().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn missing_token_skips_registration() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(None));
        let (service, registrar) = push_service_with(bridge);

        service.register_after_login("access").await.unwrap();
        assert!(registrar.registrations().is_empty());
        assert_eq!(service.store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn login_registers_token_with_access_token() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(Some("tok-2")));
        let (service, registrar) = push_service_with(bridge);

        service.spawn_registration("bearer-xyz".into()).await.unwrap();
        assert_eq!(
            registrar.registrations(),
            vec![("tok-2".to_string(), "bearer-xyz".to_string())]
        );
    }

    #[tokio::test]
    async fn registration_failure_is_swallowed() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(Some("tok-3")));
        let (service, registrar) = push_service_with(bridge);
        registrar.fail_next();

        // The spawned task must finish cleanly even though the backend failed.
        service.spawn_registration("bearer".into()).await.unwrap();
        assert!(registrar.registrations().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_token_and_badge() {
        let bridge = Arc::new(SimulatedBridge::new().with_push_token(Some("tok-4")));
        let (service, _) = push_service_with(Arc::clone(&bridge));
        service.current_token().await.unwrap();

        service.clear().await.unwrap();
        assert_eq!(service.store().load().unwrap(), None);
        assert!(bridge.calls().contains(&BridgeCall::ClearBadge));
    }

    struct BrokenStore;

    impl NativeKeyValueStore for BrokenStore {
        fn get_value(&self, _key: &str) -> Result<Option<String>> {
            Err(CamterError::Database("disk I/O error".into()))
        }

        fn set_value(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CamterError::Database("disk I/O error".into()))
        }

        fn remove_value(&self, _key: &str) -> Result<()> {
            Err(CamterError::Database("disk I/O error".into()))
        }
    }

    #[tokio::test]
    async fn badge_is_reset_even_when_store_fails() {
        let bridge = Arc::new(SimulatedBridge::new());
        let platform: Arc<dyn PlatformBridge> = bridge.clone();
        let service = PushTokenService::new(
            platform,
            TokenStore::new(Arc::new(BrokenStore)),
            Arc::new(crate::test_support::RecordingRegistrar::default()),
        );

        let err = service.clear().await.unwrap_err();
        assert!(matches!(err, CamterError::Database(_)));
        assert!(bridge.calls().contains(&BridgeCall::ClearBadge));
    }

    #[test]
    fn registration_body_shape() {
        let body = serde_json::to_value(RegisterTokenBody {
            token: "t",
            platform: "android",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "token": "t", "platform": "android" }));
    }
}
