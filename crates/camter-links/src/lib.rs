// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camter shell — deep-link routing.
//
// Turns OS-delivered activations (custom schemes, universal links and
// notification taps) into in-app navigation paths.

pub mod resolver;
pub mod routes;

pub use resolver::{DeepLinkResolver, IgnoreReason, Resolution};
pub use routes::resolve_path;
