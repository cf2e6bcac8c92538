// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless event loop.
//
// Each input line is one JSON object tagged by `event`, standing in for a
// callback the native WebView would deliver. Background work (bridge
// handlers, settle delays) is awaited before the loop returns at EOF.

use std::collections::BTreeMap;

use camter_core::error::Result;
use camter_host::{HostContainer, LoadError, NavigationDecision, NavigationRequest};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::services::app_services::AppServices;
use crate::webview::HostOutput;

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum InputEvent {
    /// Raw payload from the page's message channel. A JSON string is used
    /// verbatim; any other value is re-serialised.
    Message { payload: Value },
    DeepLink { url: String },
    Notification { payload: BTreeMap<String, String> },
    Navigate {
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
    },
    LoadStarted { url: String },
    LoadProgress { progress: f32 },
    LoadFinished,
    LoadError {
        url: String,
        status: Option<u16>,
        description: Option<String>,
    },
    Background,
    Foreground,
    Reload,
    State,
}

/// Drive `services` from `input` until EOF.
pub async fn run<R>(services: &AppServices, links: &[String], input: R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let container = services.container();
    if let Some(dir) = services.data_dir() {
        debug!(path = %dir.display(), "using data directory");
    }
    container.start()?;

    for link in links {
        container.on_deep_link(link);
    }

    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(line) {
            Ok(event) => {
                if let Some(handle) = handle_event(services, container, event)? {
                    track(&mut tasks, handle);
                }
            }
            Err(e) => warn!(error = %e, "skipping unrecognised input line"),
        }
        while let Some(done) = tasks.try_join_next() {
            if let Err(e) = done {
                warn!(error = %e, "background task failed");
            }
        }
    }

    info!(pending = tasks.len(), "input closed; waiting for background work");
    while let Some(done) = tasks.join_next().await {
        if let Err(e) = done {
            warn!(error = %e, "background task failed");
        }
    }
    Ok(())
}

/// Hand a container task to the set so finished ones can be reaped as the
/// loop runs.
fn track(tasks: &mut JoinSet<()>, handle: JoinHandle<()>) {
    tasks.spawn(async move {
        if let Err(e) = handle.await {
            warn!(error = %e, "background task failed");
        }
    });
}

fn handle_event(
    services: &AppServices,
    container: &HostContainer,
    event: InputEvent,
) -> Result<Option<JoinHandle<()>>> {
    match event {
        InputEvent::Message { payload } => {
            let raw = match payload {
                Value::String(raw) => raw,
                other => other.to_string(),
            };
            return Ok(Some(container.on_message(raw)));
        }
        InputEvent::DeepLink { url } => {
            container.on_deep_link(&url);
        }
        InputEvent::Notification { payload } => {
            container.on_notification(&payload);
        }
        InputEvent::Navigate { url, headers } => {
            let decision = container.on_navigation(&NavigationRequest { url: url.clone(), headers });
            let label = match decision {
                NavigationDecision::Allow => "allow",
                NavigationDecision::ReloadWithHeaders { .. } => "reloadWithHeaders",
                NavigationDecision::LaunchPaymentApp(_) => "launchPaymentApp",
                NavigationDecision::OpenExternally(_) => "openExternally",
            };
            services.output().emit(&HostOutput::Navigation {
                url: &url,
                decision: label,
            })?;
        }
        InputEvent::LoadStarted { url } => container.on_load_started(&url),
        InputEvent::LoadProgress { progress } => container.on_load_progress(progress),
        InputEvent::LoadFinished => return Ok(container.on_load_finished()),
        InputEvent::LoadError {
            url,
            status,
            description,
        } => {
            let error = match status {
                Some(status) => LoadError::Http { url, status },
                None => LoadError::Failed {
                    url,
                    description: description.unwrap_or_default(),
                },
            };
            if let Some(human) = container.on_load_error(&error) {
                services.output().emit(&HostOutput::Error {
                    message: &human.message,
                    suggestion: &human.suggestion,
                    retriable: human.retriable,
                })?;
            }
        }
        InputEvent::Background => container.on_background(),
        InputEvent::Foreground => return Ok(container.on_foreground()),
        InputEvent::Reload => {
            if let Err(e) = container.reload() {
                warn!(error = %e, "reload failed");
            }
        }
        InputEvent::State => {
            let state = container.state();
            let cached_token = match services.token_store().load() {
                Ok(token) => token.is_some(),
                Err(e) => {
                    warn!(error = %e, "could not read cached push token");
                    false
                }
            };
            info!(
                loading = state.loading,
                progress = state.progress,
                url = ?state.current_url,
                foreground = state.foreground,
                interactive = state.interactive,
                queued = state.queued,
                dropped = state.dropped,
                error = ?state.last_error.as_ref().map(|e| &e.message),
                cached_token,
                "container state"
            );
        }
    }
    Ok(None)
}
