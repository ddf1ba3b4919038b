//! Terminal User Interface for podcastr using ratatui.
//!
//! The homepage lists the latest and all episodes, the detail screen shows a
//! single episode, and a player bar at the bottom reflects the shared player
//! state on every screen.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::App;
pub use types::{Action, Focus, Screen};

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// Poll for keyboard events with a timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
