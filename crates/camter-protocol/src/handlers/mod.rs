// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in action handlers, one module per capability.

pub mod image;
pub mod permission;
pub mod push;
pub mod share;
pub mod system;
