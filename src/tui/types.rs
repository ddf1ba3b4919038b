//! TUI type definitions for screens, focus, and actions.

/// The current screen/view of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Latest and all episodes
    Home,
    /// A single episode with its description
    Detail,
    /// Waiting for the API
    Loading,
}

/// Which homepage section has the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Latest,
    All,
}

/// Work the event loop has to do on behalf of the TUI.
///
/// Player controls are applied directly to the shared player and never show
/// up here.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Fetch the episode list again
    Reload,
    /// Fetch and show the episode with this id
    OpenEpisode(String),
}
