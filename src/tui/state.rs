//! Application state management and input handling.

use crate::catalog::HomeListing;
use crate::context::PlayerContext;
use crate::types::Episode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, Focus, Screen};

/// Application state for the TUI.
pub struct App {
    /// Current screen being displayed
    pub screen: Screen,
    /// Homepage section with the cursor
    pub focus: Focus,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Episodes shown on the homepage
    pub listing: HomeListing,
    /// List state for the latest episodes
    pub latest_list_state: ListState,
    /// List state for the remaining episodes
    pub all_list_state: ListState,
    /// Episode shown on the detail screen
    pub detail: Option<Episode>,
    /// Scroll offset of the detail description
    pub detail_scroll: u16,
    /// Loading message
    pub loading_message: String,
    /// Status message shown in the footer
    pub status_message: Option<String>,
    /// Error message to display
    pub error_message: Option<String>,
    /// Whether help modal is shown
    pub show_help: bool,
    /// Shared player
    pub player: PlayerContext,
}

impl App {
    /// Create a new App on the homepage.
    pub fn new(player: PlayerContext) -> Self {
        Self {
            screen: Screen::Home,
            focus: Focus::Latest,
            should_quit: false,
            listing: HomeListing::default(),
            latest_list_state: ListState::default(),
            all_list_state: ListState::default(),
            detail: None,
            detail_scroll: 0,
            loading_message: String::new(),
            status_message: None,
            error_message: None,
            show_help: false,
            player,
        }
    }

    /// Set the app to loading state with a message.
    pub fn set_loading(&mut self, message: &str) {
        self.screen = Screen::Loading;
        self.loading_message = message.to_string();
    }

    /// Set the homepage episodes and switch to the homepage.
    pub fn set_listing(&mut self, listing: HomeListing) {
        self.latest_list_state
            .select((!listing.latest.is_empty()).then_some(0));
        self.all_list_state
            .select((!listing.all.is_empty()).then_some(0));
        self.focus = if listing.latest.is_empty() && !listing.all.is_empty() {
            Focus::All
        } else {
            Focus::Latest
        };
        if !listing.is_empty() {
            self.status_message = None;
        }
        self.listing = listing;
        self.screen = Screen::Home;
    }

    /// Show a single episode.
    pub fn show_episode(&mut self, episode: Episode) {
        self.detail = Some(episode);
        self.detail_scroll = 0;
        self.screen = Screen::Detail;
    }

    /// Go back to the homepage.
    pub fn show_home(&mut self) {
        self.screen = Screen::Home;
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
    }

    /// Clear error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    /// Episode under the cursor on the homepage.
    pub fn selected_episode(&self) -> Option<&Episode> {
        match self.focus {
            Focus::Latest => self
                .latest_list_state
                .selected()
                .and_then(|i| self.listing.latest.get(i)),
            Focus::All => self
                .all_list_state
                .selected()
                .and_then(|i| self.listing.all.get(i)),
        }
    }

    /// Position of the selected episode in the homepage queue.
    pub fn selected_queue_index(&self) -> Option<usize> {
        match self.focus {
            Focus::Latest => self
                .latest_list_state
                .selected()
                .filter(|i| *i < self.listing.latest.len())
                .map(|i| self.listing.queue_index_latest(i)),
            Focus::All => self
                .all_list_state
                .selected()
                .filter(|i| *i < self.listing.all.len())
                .map(|i| self.listing.queue_index_all(i)),
        }
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') | KeyCode::Char('q') = key.code {
                self.should_quit = true;
                return Action::Quit;
            }
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Action::None;
        }

        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return Action::None;
        }

        if self.screen == Screen::Loading {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
                return Action::Quit;
            }
            return Action::None;
        }

        if self.handle_player_input(key) {
            return Action::None;
        }

        match self.screen {
            Screen::Home => self.handle_home_input(key),
            Screen::Detail => self.handle_detail_input(key),
            Screen::Loading => Action::None,
        }
    }

    /// Player controls, available on every screen. Returns whether the key
    /// was consumed.
    fn handle_player_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') => self.player.toggle_play(),
            KeyCode::Char('l') => self.player.toggle_loop(),
            KeyCode::Char('s') => self.player.toggle_shuffle(),
            KeyCode::Char('n') => self.player.play_next(),
            KeyCode::Char('b') => self.player.play_previous(),
            KeyCode::Char('c') => self.player.clear_player_state(),
            _ => return false,
        }
        true
    }

    fn focused_list(&mut self) -> (&mut ListState, usize) {
        match self.focus {
            Focus::Latest => (&mut self.latest_list_state, self.listing.latest.len()),
            Focus::All => (&mut self.all_list_state, self.listing.all.len()),
        }
    }

    fn handle_home_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let (state, len) = self.focused_list();
                let i = state.selected().unwrap_or(0);
                if i + 1 < len {
                    state.select(Some(i + 1));
                }
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let (state, _) = self.focused_list();
                let i = state.selected().unwrap_or(0);
                if i > 0 {
                    state.select(Some(i - 1));
                }
                Action::None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.focus {
                    Focus::Latest => Focus::All,
                    Focus::All => Focus::Latest,
                };
                let has_items = match next {
                    Focus::Latest => !self.listing.latest.is_empty(),
                    Focus::All => !self.listing.all.is_empty(),
                };
                if has_items {
                    self.focus = next;
                }
                Action::None
            }
            KeyCode::Enter => {
                if let Some(index) = self.selected_queue_index() {
                    self.player.play_list(self.listing.queue(), index);
                }
                Action::None
            }
            KeyCode::Char('p') => {
                if let Some(episode) = self.selected_episode().cloned() {
                    self.player.play(episode);
                }
                Action::None
            }
            KeyCode::Char('o') | KeyCode::Right => match self.selected_episode() {
                Some(episode) => Action::OpenEpisode(episode.id.clone()),
                None => Action::None,
            },
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            _ => Action::None,
        }
    }

    fn handle_detail_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Char('p') => {
                if let Some(episode) = self.detail.clone() {
                    self.player.play(episode);
                }
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.show_home();
                Action::None
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            _ => Action::None,
        }
    }
}
