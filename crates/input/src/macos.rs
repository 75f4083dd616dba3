//! Accessibility permission handling on macOS.
//!
//! Cursor and keyboard injection through CGEvent is silently dropped unless
//! the process is trusted for accessibility.

use std::process::Command;

const ACCESSIBILITY_PANE: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

pub fn has_accessibility_access() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Returns `true` when already trusted; otherwise opens the Accessibility
/// pane of System Settings and returns `false`.
pub fn ensure_accessibility_access() -> bool {
    if has_accessibility_access() {
        return true;
    }

    tracing::warn!("Accessibility permission not granted, gestures cannot drive input");
    if let Err(e) = Command::new("open").arg(ACCESSIBILITY_PANE).spawn() {
        tracing::warn!(error = %e, "Failed to open System Settings");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_check_links_and_runs() {
        // Either answer is fine; the symbol has to resolve.
        let _ = has_accessibility_access();
    }
}
