// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camter shell — Native platform bridge abstractions.
//
// The traits here are the seam between the shell and the host OS. The iOS
// and Android hosts implement them in their own glue; desktop and CI builds
// use either the stub (everything unavailable) or the simulated bridge.

pub mod kv_store;
pub mod simulated;
pub mod stub;
pub mod traits;

pub use kv_store::SqliteKeyValueStore;
pub use simulated::{BridgeCall, SimulatedBridge};
pub use stub::StubBridge;
pub use traits::*;

/// Retrieves the bridge implementation for builds without a native host.
///
/// Mobile hosts construct their own `PlatformBridge` and hand it to the
/// container directly.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    Box::new(stub::StubBridge)
}
