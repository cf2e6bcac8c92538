// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

use camter_core::error::Result;

/// Return the shell's data directory, creating it if needed.
///
/// `CAMTER_DATA_DIR` overrides the conventional location.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("CAMTER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => base_dir().join("camter"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn base_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
