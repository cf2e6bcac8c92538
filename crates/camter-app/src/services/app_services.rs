// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: loads configuration, opens the token store and
// wires the bridge dispatcher into a host container.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use camter_bridge::{
    NativeKeyValueStore, PlatformBridge, SimulatedBridge, SqliteKeyValueStore, platform_bridge,
};
use camter_core::error::Result;
use camter_core::ShellConfig;
use camter_host::HostContainer;
use camter_protocol::{
    BridgeContext, BridgeDispatcher, HandlerRegistry, HttpTokenRegistrar, PushTokenService,
    TokenStore,
};
use tracing::{info, warn};

use super::data_dir;
use crate::webview::{LoggingWebView, OutputWriter};

const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "shell.db";

/// Which platform bridge backs the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeKind {
    /// Cooperative in-process device.
    Simulated,
    /// Every capability reports itself unavailable.
    Stub,
}

impl BridgeKind {
    fn build(self) -> Arc<dyn PlatformBridge> {
        match self {
            Self::Simulated => Arc::new(SimulatedBridge::new()),
            Self::Stub => Arc::from(platform_bridge()),
        }
    }
}

/// Everything the runner needs, cheaply cloneable.
#[derive(Clone)]
pub struct AppServices {
    container: HostContainer,
    output: OutputWriter,
    token_store: TokenStore,
    data_dir: Option<PathBuf>,
}

impl AppServices {
    /// Initialise with on-disk configuration and token store.
    ///
    /// A missing config file is written out with defaults so it can be
    /// edited; an unreadable one is ignored.
    pub fn init(bridge: BridgeKind) -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising services");

        let config = match load_config(&dir) {
            Some(config) => config,
            None => {
                let config = ShellConfig::default();
                if let Err(e) = persist_config(&dir, &config) {
                    warn!(error = %e, "could not write default config");
                }
                config
            }
        };
        let kv: Arc<dyn NativeKeyValueStore> =
            Arc::new(SqliteKeyValueStore::open(dir.join(STORE_FILE))?);

        let mut services = Self::build(config, bridge, kv, OutputWriter::stdout());
        services.data_dir = Some(dir);
        Ok(services)
    }

    /// In-memory token store, default or previously saved configuration.
    pub fn fallback(bridge: BridgeKind) -> Result<Self> {
        let config = data_dir::data_dir()
            .ok()
            .and_then(|dir| load_config(&dir))
            .unwrap_or_default();
        Self::in_memory(config, bridge, OutputWriter::stdout())
    }

    pub fn in_memory(config: ShellConfig, bridge: BridgeKind, output: OutputWriter) -> Result<Self> {
        let kv: Arc<dyn NativeKeyValueStore> = Arc::new(SqliteKeyValueStore::open_in_memory()?);
        Ok(Self::build(config, bridge, kv, output))
    }

    fn build(
        config: ShellConfig,
        bridge: BridgeKind,
        kv: Arc<dyn NativeKeyValueStore>,
        output: OutputWriter,
    ) -> Self {
        let platform = bridge.build();
        let registrar = Arc::new(HttpTokenRegistrar::new(
            &config.token_registration_url,
            platform.platform_name(),
        ));
        let token_store = TokenStore::new(kv);
        let push = PushTokenService::new(Arc::clone(&platform), token_store.clone(), registrar);
        let dispatcher =
            BridgeDispatcher::new(HandlerRegistry::standard(), BridgeContext::new(platform, push));

        let webview = Arc::new(LoggingWebView::new(output.clone()));
        let container = HostContainer::new(config, webview, dispatcher);
        info!(bridge = ?bridge, "host container ready");

        Self {
            container,
            output,
            token_store,
            data_dir: None,
        }
    }

    pub fn container(&self) -> &HostContainer {
        &self.container
    }

    pub fn output(&self) -> &OutputWriter {
        &self.output
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    /// Where config and store live; `None` for in-memory services.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

fn load_config(data_dir: &Path) -> Option<ShellConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &ShellConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
