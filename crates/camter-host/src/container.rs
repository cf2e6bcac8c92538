// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host container: owns the WebView's lifecycle state and ties the bridge
// dispatcher and deep-link resolver to it.
//
// All native-to-web traffic (bridge responses, deep-link navigation) goes
// through `submit`, which injects immediately when the gate is open and
// queues otherwise. The queue is flushed under the same lock that guards
// the gate, so a flush and a fresh submission never interleave.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use camter_bridge::{NativeExternalOpener, NativePaymentLauncher, PlatformBridge};
use camter_core::error::Result;
use camter_core::human_errors::HumanError;
use camter_core::types::{BridgeResponse, LinkState};
use camter_core::ShellConfig;
use camter_links::{DeepLinkResolver, Resolution};
use camter_protocol::BridgeDispatcher;
use camter_protocol::script::{navigation_script, response_script};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::gate::{DeliveryGate, MessageQueue, QueuedScript, ScriptKind};
use crate::load_error::{LoadError, LoadErrorAction, LoadErrorClassifier};
use crate::navigation::{NavigationDecision, NavigationPolicy, NavigationRequest};

/// The platform WebView as seen by the container.
pub trait WebView: Send + Sync {
    /// Run `script` in the page's JavaScript context.
    fn evaluate_script(&self, script: &str) -> Result<()>;

    /// Start loading `url` with extra request headers.
    fn load_url(&self, url: &str, headers: &BTreeMap<String, String>) -> Result<()>;

    fn reload(&self) -> Result<()>;
}

/// Point-in-time view of the container for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerState {
    pub loading: bool,
    pub progress: f32,
    pub current_url: Option<String>,
    pub foreground: bool,
    pub interactive: bool,
    pub queued: usize,
    pub dropped: u64,
    pub last_error: Option<HumanError>,
}

struct Inner {
    gate: DeliveryGate,
    queue: MessageQueue,
    resolver: DeepLinkResolver,
    loading: bool,
    progress: f32,
    current_url: Option<String>,
    last_error: Option<HumanError>,
}

#[derive(Clone)]
pub struct HostContainer {
    config: Arc<ShellConfig>,
    webview: Arc<dyn WebView>,
    dispatcher: BridgeDispatcher,
    navigation: NavigationPolicy,
    load_errors: LoadErrorClassifier,
    inner: Arc<Mutex<Inner>>,
}

impl HostContainer {
    pub fn new(config: ShellConfig, webview: Arc<dyn WebView>, dispatcher: BridgeDispatcher) -> Self {
        let inner = Inner {
            gate: DeliveryGate::new(),
            queue: MessageQueue::new(config.max_queued_messages),
            resolver: DeepLinkResolver::new(&config),
            loading: false,
            progress: 0.0,
            current_url: None,
            last_error: None,
        };
        Self {
            navigation: NavigationPolicy::new(&config),
            load_errors: LoadErrorClassifier::new(&config),
            config: Arc::new(config),
            webview,
            dispatcher,
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn platform(&self) -> &Arc<dyn PlatformBridge> {
        &self.dispatcher.context().platform
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Load the configured web app.
    pub fn start(&self) -> Result<()> {
        info!(url = %self.config.web_url, "loading web app");
        self.webview.load_url(&self.config.web_url, &BTreeMap::new())
    }

    // -- Delivery --

    fn inject(&self, script: &str) -> bool {
        match self.webview.evaluate_script(script) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "script injection failed; message lost");
                false
            }
        }
    }

    /// Inject now if interactive, otherwise queue. Returns whether the
    /// script was injected.
    fn submit(&self, kind: ScriptKind, script: String) -> bool {
        let mut inner = self.lock();
        if inner.gate.is_interactive() {
            return self.inject(&script);
        }
        debug!(?kind, queued = inner.queue.len() + 1, "webview not interactive; queueing script");
        inner.queue.push(QueuedScript::new(kind, script));
        false
    }

    fn deliver_response(&self, response: &BridgeResponse) {
        match response_script(&self.config.response_handler, response) {
            Ok(script) => {
                self.submit(ScriptKind::Response, script);
            }
            Err(e) => error!(request_id = %response.request_id, error = %e, "could not encode bridge response"),
        }
    }

    fn deliver_navigation(&self, resolution: Resolution) -> Resolution {
        let mut activation = match resolution {
            Resolution::Navigate(activation) => activation,
            ignored @ Resolution::Ignored(_) => return ignored,
        };
        let path = activation.resolved_path.clone().unwrap_or_else(|| "/".to_string());
        match navigation_script(&self.config.navigation_handler, &path) {
            Ok(script) => {
                if self.submit(ScriptKind::Navigation, script) {
                    activation.state = LinkState::Delivered;
                }
            }
            Err(e) => error!(%path, error = %e, "could not encode navigation"),
        }
        Resolution::Navigate(activation)
    }

    // -- Bridge messages --

    /// Handle one raw message from the WebView channel in the background.
    pub fn on_message(&self, raw: String) -> JoinHandle<()> {
        let container = self.clone();
        tokio::spawn(async move { container.handle_message(&raw).await })
    }

    /// Dispatch one raw message and deliver its response, if any.
    pub async fn handle_message(&self, raw: &str) {
        if let Some(response) = self.dispatcher.dispatch_raw(raw).await {
            self.deliver_response(&response);
        }
    }

    // -- Activations --

    pub fn on_deep_link(&self, raw_url: &str) -> Resolution {
        let resolution = self.lock().resolver.resolve(raw_url);
        self.deliver_navigation(resolution)
    }

    pub fn on_notification(&self, payload: &BTreeMap<String, String>) -> Resolution {
        let resolution = self.lock().resolver.resolve_notification(payload);
        self.deliver_navigation(resolution)
    }

    // -- Navigation --

    /// Decide on a navigation the WebView is about to perform and carry out
    /// any redirection. The WebView cancels its own load unless the result
    /// is `Allow`.
    pub fn on_navigation(&self, request: &NavigationRequest) -> NavigationDecision {
        let decision = self.navigation.evaluate(request);
        match &decision {
            NavigationDecision::Allow => {}
            NavigationDecision::ReloadWithHeaders { url, headers } => {
                if let Err(e) = self.webview.load_url(url, headers) {
                    warn!(%url, error = %e, "could not reissue load with headers");
                }
            }
            NavigationDecision::LaunchPaymentApp(url) => {
                info!(%url, "handing intent URL to payment SDK");
                if let Err(e) = self.platform().launch_payment_app(url) {
                    warn!(%url, error = %e, "payment app launch failed");
                }
            }
            NavigationDecision::OpenExternally(url) => {
                info!(%url, "opening URL outside the webview");
                if let Err(e) = self.platform().open_url(url) {
                    warn!(%url, error = %e, "external open failed");
                }
            }
        }
        decision
    }

    // -- Lifecycle --

    pub fn on_load_started(&self, url: &str) {
        let mut inner = self.lock();
        inner.gate.load_started();
        inner.loading = true;
        inner.progress = 0.0;
        inner.current_url = Some(url.to_string());
        inner.last_error = None;
        debug!(%url, "load started");
    }

    pub fn on_load_progress(&self, progress: f32) {
        self.lock().progress = progress.clamp(0.0, 1.0);
    }

    /// Load completed. Returns the settle task that will reopen the gate,
    /// or `None` while the app is in the background.
    pub fn on_load_finished(&self) -> Option<JoinHandle<()>> {
        let ticket = {
            let mut inner = self.lock();
            inner.loading = false;
            inner.progress = 1.0;
            inner.gate.load_finished()
        };
        ticket.map(|t| self.spawn_settle(t))
    }

    pub fn on_background(&self) {
        self.lock().gate.backgrounded();
        debug!("app backgrounded; delivery paused");
    }

    /// Back in the foreground. Returns the settle task when a page is loaded.
    pub fn on_foreground(&self) -> Option<JoinHandle<()>> {
        let ticket = self.lock().gate.foregrounded();
        ticket.map(|t| self.spawn_settle(t))
    }

    fn spawn_settle(&self, ticket: u64) -> JoinHandle<()> {
        let container = self.clone();
        let delay = self.config.settle_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            container.reopen(ticket);
        })
    }

    fn reopen(&self, ticket: u64) -> usize {
        let mut inner = self.lock();
        if !inner.gate.open(ticket) {
            return 0;
        }
        let pending = inner.queue.drain();
        let count = pending.len();
        for entry in pending {
            self.inject(&entry.script);
        }
        info!(flushed = count, "webview interactive");
        count
    }

    /// Reload the page. Queued responses belong to the page being torn down
    /// and are discarded; queued navigations survive.
    pub fn reload(&self) -> Result<usize> {
        let discarded = {
            let mut inner = self.lock();
            inner.gate.load_started();
            inner.loading = true;
            inner.last_error = None;
            inner.queue.discard(ScriptKind::Response)
        };
        if discarded > 0 {
            info!(discarded, "dropped queued responses for reloaded page");
        }
        self.webview.reload()?;
        Ok(discarded)
    }

    /// Classify a load failure. Returns the error to show, if any.
    pub fn on_load_error(&self, error: &LoadError) -> Option<HumanError> {
        match self.load_errors.classify(error) {
            LoadErrorAction::Surface(human) => {
                let mut inner = self.lock();
                inner.loading = false;
                inner.last_error = Some(human.clone());
                Some(human)
            }
            LoadErrorAction::Filtered | LoadErrorAction::Ignored => None,
        }
    }

    pub fn state(&self) -> ContainerState {
        let inner = self.lock();
        ContainerState {
            loading: inner.loading,
            progress: inner.progress,
            current_url: inner.current_url.clone(),
            foreground: inner.gate.is_foreground(),
            interactive: inner.gate.is_interactive(),
            queued: inner.queue.len(),
            dropped: inner.queue.dropped(),
            last_error: inner.last_error.clone(),
        }
    }
}
