//! The shared player handle.
//!
//! One [`PlayerContext`] is created at startup and cloned into every consumer
//! (views, the audio collaborator, the event loop). Clones share the same
//! state. Every mutation runs under the channel lock and then wakes every
//! [`watch::Receiver`] obtained from [`PlayerContext::subscribe`].

use crate::player::PlayerState;
use crate::types::Episode;
use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

struct Inner {
    state: watch::Sender<PlayerState>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

/// Cloneable handle to the single [`PlayerState`] of the application.
#[derive(Clone)]
pub struct PlayerContext {
    inner: Arc<Inner>,
}

impl fmt::Debug for PlayerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerContext")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerContext {
    /// Create the player with an OS-seeded shuffle source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create the player with a caller-supplied shuffle source.
    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        let (state, _) = watch::channel(PlayerState::new());
        Self {
            inner: Arc::new(Inner {
                state,
                rng: Mutex::new(Box::new(rng)),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PlayerState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is marked changed after every effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.inner.state.subscribe()
    }

    fn update<F>(&self, op: &str, f: F)
    where
        F: FnOnce(&mut PlayerState),
    {
        let changed = self.inner.state.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        });

        if changed {
            let state = self.inner.state.borrow();
            debug!(
                "{}: index={} len={} playing={} looping={} shuffling={}",
                op,
                state.current_episode_index(),
                state.episode_list().len(),
                state.is_playing(),
                state.is_looping(),
                state.is_shuffling()
            );
        }
    }

    pub fn play_list(&self, list: Vec<Episode>, index: usize) {
        self.update("play_list", |state| state.play_list(list, index));
    }

    pub fn play(&self, episode: Episode) {
        self.update("play", |state| state.play(episode));
    }

    pub fn toggle_play(&self) {
        self.update("toggle_play", PlayerState::toggle_play);
    }

    pub fn toggle_loop(&self) {
        self.update("toggle_loop", PlayerState::toggle_loop);
    }

    pub fn toggle_shuffle(&self) {
        self.update("toggle_shuffle", PlayerState::toggle_shuffle);
    }

    pub fn set_playing_state(&self, playing: bool) {
        self.update("set_playing_state", |state| {
            state.set_playing_state(playing)
        });
    }

    pub fn clear_player_state(&self) {
        self.update("clear_player_state", PlayerState::clear_player_state);
    }

    pub fn play_previous(&self) {
        self.update("play_previous", PlayerState::play_previous);
    }

    pub fn play_next(&self) {
        let mut rng = self
            .inner
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.update("play_next", |state| state.play_next(&mut *rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str) -> Episode {
        Episode {
            id: id.to_string(),
            title: id.to_uppercase(),
            members: String::new(),
            thumbnail: String::new(),
            duration: 60,
            url: format!("https://example.com/{}.mp3", id),
            published_at: String::new(),
            duration_as_string: String::new(),
            description: String::new(),
        }
    }

    fn context() -> PlayerContext {
        PlayerContext::with_rng(StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_clones_share_state() {
        let player = context();
        let view = player.clone();

        player.play_list(vec![episode("a"), episode("b")], 1);

        let seen = view.state();
        assert_eq!(seen.current_episode_index(), 1);
        assert!(seen.is_playing());
        assert!(seen.has_previous());
    }

    #[test]
    fn test_subscriber_sees_updates() {
        let player = context();
        let mut rx = player.subscribe();
        assert!(!rx.has_changed().unwrap());

        player.toggle_shuffle();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_shuffling());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_noop_does_not_notify() {
        let player = context();
        player.play(episode("a"));
        let mut rx = player.subscribe();
        rx.borrow_and_update();

        player.play_previous();
        player.play_next();
        player.set_playing_state(true);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_play_next_under_shuffle_uses_injected_rng() {
        let player = context();
        player.play_list(vec![episode("a"), episode("b"), episode("c")], 0);
        player.toggle_shuffle();

        for _ in 0..50 {
            player.play_next();
            assert!(player.state().current_episode_index() < 3);
        }
    }

    #[test]
    fn test_end_to_end_sequential() {
        let player = context();
        player.play_list(vec![episode("a"), episode("b"), episode("c")], 1);
        player.play_next();
        assert_eq!(player.state().current_episode_index(), 2);
        assert!(!player.state().has_next());
        player.play_next();
        assert_eq!(player.state().current_episode_index(), 2);

        player.clear_player_state();
        let state = player.state();
        assert!(state.episode_list().is_empty());
        assert!(state.is_playing());
    }

    #[tokio::test]
    async fn test_subscriber_wakes_across_tasks() {
        let player = context();
        let mut rx = player.subscribe();

        let writer = player.clone();
        tokio::spawn(async move {
            writer.play(episode("a"));
        });

        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().current_episode().map(|e| e.id.clone()),
            Some("a".to_string())
        );
    }
}
