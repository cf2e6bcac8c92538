// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camter shell — WebView host container.

pub mod container;
pub mod gate;
pub mod load_error;
pub mod navigation;

pub use container::{ContainerState, HostContainer, WebView};
pub use gate::{DeliveryGate, MessageQueue, QueuedScript, ScriptKind};
pub use load_error::{LoadError, LoadErrorAction, LoadErrorClassifier};
pub use navigation::{NavigationDecision, NavigationPolicy, NavigationRequest};
