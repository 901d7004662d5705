//! Hooks into the surrounding application shell
//!
//! The runtime never touches a user interface directly. Status messages and
//! teardown of UI state go through [`ShellCollaborator`]; every hook
//! defaults to doing nothing.

use tracing::info;

/// Application shell notified by the module manager
#[cfg_attr(test, mockall::automock)]
pub trait ShellCollaborator {
    /// Show a status line
    fn status_update(&self, _message: &str) {}

    /// Enable or disable user interaction with the module view
    fn set_view_enabled(&self, _enabled: bool) {}

    /// Remove menu merges contributed by modules
    fn remove_ui_merges(&self) {}

    /// Drop pending sync entries
    fn clear_sync_entries(&self) {}

    /// Cancel timers bound to module views
    fn clear_timeouts(&self) {}

    /// Empty the tree models showing module data
    fn clear_tree_models(&self) {}

    /// Restore the default window title
    fn reset_title(&self) {}
}

/// Shell for command line use; status lines go to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessShell;

impl ShellCollaborator for HeadlessShell {
    fn status_update(&self, message: &str) {
        info!(status = %message);
    }
}
