//! Playback selection state.
//!
//! [`PlayerState`] tracks which episode is selected and which mode governs the
//! selection. It never touches audio; the audio collaborator reads it.

use crate::types::Episode;
use log::warn;
use rand::Rng;

/// The playback queue, the selected index and the three playback flags.
///
/// `has_next` and `has_previous` are computed on every call from the stored
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    episode_list: Vec<Episode>,
    current_episode_index: usize,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
}

impl PlayerState {
    /// Empty queue, index 0, every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episode_list(&self) -> &[Episode] {
        &self.episode_list
    }

    pub fn current_episode_index(&self) -> usize {
        self.current_episode_index
    }

    /// The selected episode, or `None` when the queue is empty.
    pub fn current_episode(&self) -> Option<&Episode> {
        self.episode_list.get(self.current_episode_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    pub fn has_previous(&self) -> bool {
        self.current_episode_index > 0
    }

    /// Shuffle always has a next episode, even on an empty queue.
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_episode_index + 1 < self.episode_list.len()
    }

    /// Replace the queue and start playing at `index`.
    ///
    /// An index past the end is clamped to the last episode (0 for an empty
    /// list) so the index always points into the queue.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) {
        let last = list.len().saturating_sub(1);
        if index > last {
            warn!(
                "play_list index {} out of range for {} episodes, clamping to {}",
                index,
                list.len(),
                last
            );
        }

        self.episode_list = list;
        self.current_episode_index = index.min(last);
        self.is_playing = true;
    }

    /// Play a single episode as a one-element queue.
    pub fn play(&mut self, episode: Episode) {
        self.play_list(vec![episode], 0);
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
    }

    pub fn set_playing_state(&mut self, state: bool) {
        self.is_playing = state;
    }

    /// Empty the queue and reset the index. Flags are kept.
    pub fn clear_player_state(&mut self) {
        self.episode_list.clear();
        self.current_episode_index = 0;
    }

    /// Step back one episode. Shuffle does not apply.
    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.current_episode_index -= 1;
        }
    }

    /// Advance to the next episode.
    ///
    /// Under shuffle the index is drawn uniformly from the whole queue with
    /// `rng`, possibly the current one again. An empty queue leaves the index
    /// at 0.
    pub fn play_next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_shuffling {
            if !self.episode_list.is_empty() {
                self.current_episode_index = rng.random_range(0..self.episode_list.len());
            }
        } else if self.has_next() {
            self.current_episode_index += 1;
        }
    }
}
