// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camter shell — web/native bridge protocol.
//
// Native side: `BridgeDispatcher` routes each inbound `BridgeMessage` to the
// handler registered for its action and turns the outcome into at most one
// `BridgeResponse`. Web side: `BridgeClient` and `PendingRequests` model the
// hosted content's half of the contract (request ids, timeouts, reload).

pub mod client;
pub mod dispatcher;
pub mod handlers;
pub mod pending;
pub mod push;
pub mod registry;
pub mod script;

pub use client::BridgeClient;
pub use dispatcher::{BridgeContext, BridgeDispatcher};
pub use pending::PendingRequests;
pub use push::{HttpTokenRegistrar, PushTokenService, TokenRegistrar, TokenStore};
pub use registry::{ActionHandler, HandlerRegistry};

#[cfg(test)]
pub(crate) mod test_support;
