// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless WebView: everything the container asks of the page is written
// out as one JSON line per action.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use camter_core::error::Result;
use camter_host::WebView;
use serde::Serialize;
use tracing::{debug, info};

/// One line of runner output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostOutput<'a> {
    Script {
        script: &'a str,
    },
    Load {
        url: &'a str,
        headers: &'a BTreeMap<String, String>,
    },
    Reload,
    Navigation {
        url: &'a str,
        decision: &'a str,
    },
    Error {
        message: &'a str,
        suggestion: &'a str,
        retriable: bool,
    },
}

/// Shared line-oriented sink.
#[derive(Clone)]
pub struct OutputWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputWriter {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn emit(&self, output: &HostOutput<'_>) -> Result<()> {
        let line = serde_json::to_string(output)?;
        let mut writer = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// [`WebView`] with no page behind it.
pub struct LoggingWebView {
    output: OutputWriter,
}

impl LoggingWebView {
    pub fn new(output: OutputWriter) -> Self {
        Self { output }
    }
}

impl WebView for LoggingWebView {
    fn evaluate_script(&self, script: &str) -> Result<()> {
        debug!(bytes = script.len(), "injecting script");
        self.output.emit(&HostOutput::Script { script })
    }

    fn load_url(&self, url: &str, headers: &BTreeMap<String, String>) -> Result<()> {
        info!(%url, headers = headers.len(), "loading url");
        self.output.emit(&HostOutput::Load { url, headers })
    }

    fn reload(&self) -> Result<()> {
        info!("reloading page");
        self.output.emit(&HostOutput::Reload)
    }
}
