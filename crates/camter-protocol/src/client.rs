// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web-side half of the bridge: issues requests, correlates responses.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use camter_core::error::{CamterError, Result};
use camter_core::types::{Action, BridgeMessage, BridgeResponse};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::pending::PendingRequests;

/// Request/response client over the message channel.
///
/// Outbound messages are serialised into `outbox`; whoever owns the receiver
/// carries them to the native side and feeds replies back via [`receive`].
///
/// [`receive`]: BridgeClient::receive
pub struct BridgeClient {
    pending: Mutex<PendingRequests>,
    outbox: mpsc::UnboundedSender<String>,
    timeout: Duration,
}

impl BridgeClient {
    pub fn new(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (outbox, rx) = mpsc::unbounded_channel();
        let client = Self {
            pending: Mutex::new(PendingRequests::new()),
            outbox,
            timeout,
        };
        (client, rx)
    }

    fn pending(&self) -> MutexGuard<'_, PendingRequests> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Call `action` and wait for its response.
    pub async fn call(&self, action: Action, data: Option<Value>) -> Result<Value> {
        let mut message = BridgeMessage::new(action);
        message.data = data;
        self.request(message).await
    }

    /// Send `message` under a fresh request id and wait for the outcome.
    ///
    /// Fails with `timeout` when nothing arrives in time, and with
    /// `cancelled` when the pending set is reset underneath the call.
    pub async fn request(&self, mut message: BridgeMessage) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        message.request_id = Some(request_id.clone());
        let raw = serde_json::to_string(&message)?;

        let rx = self.pending().register(request_id.clone());
        if self.outbox.send(raw).is_err() {
            self.pending().remove(&request_id);
            return Err(CamterError::Bridge("message channel closed".into()));
        }
        debug!(%request_id, action = %message.action, "bridge request sent");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CamterError::Cancelled),
            Err(_) => {
                self.pending().remove(&request_id);
                warn!(%request_id, "bridge request timed out");
                Err(CamterError::Timeout)
            }
        }
    }

    /// Send a message that expects no reply.
    pub fn post(&self, action: Action, data: Option<Value>) -> Result<()> {
        let mut message = BridgeMessage::new(action);
        message.data = data;
        let raw = serde_json::to_string(&message)?;
        self.outbox
            .send(raw)
            .map_err(|_| CamterError::Bridge("message channel closed".into()))
    }

    /// Feed one raw response from the native side. Returns whether it
    /// settled a pending request.
    pub fn receive(&self, raw: &str) -> bool {
        match serde_json::from_str::<BridgeResponse>(raw) {
            Ok(response) => self.pending().resolve(&response),
            Err(e) => {
                warn!(error = %e, "ignoring undecodable bridge response");
                false
            }
        }
    }

    /// Page reload: every in-flight call fails with `cancelled`.
    pub fn reset(&self) -> usize {
        self.pending().reset()
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::BridgeDispatcher;
    use crate::registry::HandlerRegistry;
    use crate::test_support::context_with;
    use camter_bridge::SimulatedBridge;
    use serde_json::json;
    use std::sync::Arc;

    /// Wire a client to a dispatcher over in-memory channels.
    fn loopback() -> Arc<BridgeClient> {
        let (client, mut outbox) = BridgeClient::new(Duration::from_secs(30));
        let client = Arc::new(client);
        let dispatcher = BridgeDispatcher::new(
            HandlerRegistry::standard(),
            context_with(Arc::new(SimulatedBridge::new())),
        );
        let replies = Arc::clone(&client);
        tokio::spawn(async move {
            while let Some(raw) = outbox.recv().await {
                if let Some(resp) = dispatcher.dispatch_raw(&raw).await {
                    replies.receive(&serde_json::to_string(&resp).unwrap());
                }
            }
        });
        client
    }

    #[tokio::test]
    async fn round_trip_through_dispatcher() {
        let client = loopback();
        let status = client
            .call(Action::CheckPermission, Some(json!({ "type": "photos" })))
            .await
            .unwrap();
        assert_eq!(status["granted"], true);
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn failure_code_comes_back_as_error() {
        let client = loopback();
        let err = client.call(Action::PickImage, None).await.unwrap_err();
        assert!(matches!(err, CamterError::MissingSource));
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_call_times_out() {
        let (client, _outbox) = BridgeClient::new(Duration::from_secs(30));

        let err = client.call(Action::GetFcmToken, None).await.unwrap_err();
        assert!(matches!(err, CamterError::Timeout));
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn reset_cancels_in_flight_call() {
        let (client, mut outbox) = BridgeClient::new(Duration::from_secs(30));
        let client = Arc::new(client);

        let caller = Arc::clone(&client);
        let call = tokio::spawn(async move { caller.call(Action::GetFcmToken, None).await });
        outbox.recv().await.unwrap();

        assert_eq!(client.reset(), 1);
        assert!(matches!(call.await.unwrap(), Err(CamterError::Cancelled)));
    }

    #[tokio::test]
    async fn response_is_delivered_exactly_once() {
        let (client, mut outbox) = BridgeClient::new(Duration::from_secs(30));
        let client = Arc::new(client);

        let caller = Arc::clone(&client);
        let call = tokio::spawn(async move { caller.call(Action::GetFcmToken, None).await });
        let sent: BridgeMessage = serde_json::from_str(&outbox.recv().await.unwrap()).unwrap();
        let id = sent.request_id.unwrap();

        let reply = serde_json::to_string(&BridgeResponse::ok(&id, json!("tok"))).unwrap();
        assert!(client.receive(&reply));
        assert!(!client.receive(&reply));
        assert_eq!(call.await.unwrap().unwrap(), json!("tok"));
    }

    #[test]
    fn post_carries_no_request_id() {
        let (client, mut outbox) = BridgeClient::new(Duration::from_secs(1));
        client.post(Action::NotifyLogout, None).unwrap();
        let sent: BridgeMessage = serde_json::from_str(&outbox.try_recv().unwrap()).unwrap();
        assert_eq!(sent.request_id, None);
    }
}
