// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outstanding bridge requests on the web side, keyed by request id.
//
// Each entry is settled at most once: resolving removes it, so a duplicate
// or late response finds nothing and is discarded.

use std::collections::HashMap;

use camter_core::error::{CamterError, Result};
use camter_core::types::BridgeResponse;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Settler = oneshot::Sender<Result<Value>>;

#[derive(Default)]
pub struct PendingRequests {
    waiting: HashMap<String, Settler>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `request_id` and return the receiver its outcome will arrive on.
    pub fn register(&mut self, request_id: impl Into<String>) -> oneshot::Receiver<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        let request_id = request_id.into();
        if self.waiting.insert(request_id.clone(), tx).is_some() {
            warn!(%request_id, "request id reused; earlier caller will see cancellation");
        }
        rx
    }

    /// Settle the request named by `response`. Returns `false` when nothing
    /// was waiting for it.
    pub fn resolve(&mut self, response: &BridgeResponse) -> bool {
        let Some(tx) = self.waiting.remove(&response.request_id) else {
            debug!(request_id = %response.request_id, "discarding response with no pending request");
            return false;
        };
        let outcome = if response.success {
            Ok(response.data.clone().unwrap_or(Value::Null))
        } else {
            let code = response.error.as_deref().unwrap_or("unknown_error");
            Err(CamterError::from_wire_code(code))
        };
        // The caller may have given up already.
        let _ = tx.send(outcome);
        true
    }

    /// Fail one request locally.
    pub fn reject(&mut self, request_id: &str, error: CamterError) -> bool {
        match self.waiting.remove(request_id) {
            Some(tx) => {
                let _ = tx.send(Err(error));
                true
            }
            None => false,
        }
    }

    /// Forget a request without settling it.
    pub fn remove(&mut self, request_id: &str) -> bool {
        self.waiting.remove(request_id).is_some()
    }

    /// Fail every outstanding request with `cancelled`, as on a page reload.
    pub fn reset(&mut self) -> usize {
        let count = self.waiting.len();
        for (_, tx) in self.waiting.drain() {
            let _ = tx.send(Err(CamterError::Cancelled));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
