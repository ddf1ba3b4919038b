//! Integration tests for podcastr.
//!
//! These tests drive the public API the way the views do: episodes come in
//! from the backend shape, land on the homepage, and are handed to the shared
//! player.

use podcastr::audio::{EpisodeEnd, handle_episode_end};
use podcastr::catalog::HomeListing;
use podcastr::config::Config;
use podcastr::context::PlayerContext;
use podcastr::player::PlayerState;
use podcastr::types::{Episode, RawEpisode};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn episode(id: &str) -> Episode {
    Episode {
        id: id.to_string(),
        title: format!("Episode {}", id),
        members: "Diego Fernandes".to_string(),
        thumbnail: format!("https://example.com/{}.jpg", id),
        duration: 1200,
        url: format!("https://example.com/{}.m4a", id),
        published_at: "8 jan 21".to_string(),
        duration_as_string: "00:20:00".to_string(),
        description: String::new(),
    }
}

fn player() -> PlayerContext {
    PlayerContext::with_rng(StdRng::seed_from_u64(2021))
}

/// Empty state, play_list([A,B,C], 1), then next twice.
#[test]
fn test_sequential_queue_scenario() {
    let player = player();
    let initial = player.state();
    assert!(initial.episode_list().is_empty());
    assert_eq!(initial.current_episode_index(), 0);
    assert!(!initial.is_playing());

    player.play_list(vec![episode("a"), episode("b"), episode("c")], 1);
    let state = player.state();
    assert!(state.is_playing());
    assert_eq!(state.current_episode_index(), 1);

    player.play_next();
    let state = player.state();
    assert_eq!(state.current_episode_index(), 2);
    assert!(!state.has_next());

    player.play_next();
    assert_eq!(player.state().current_episode_index(), 2);
}

/// play(A) gives a one-episode queue with no navigation.
#[test]
fn test_single_episode_scenario() {
    let player = player();
    player.play(episode("a"));

    let state = player.state();
    assert_eq!(state.episode_list(), &[episode("a")]);
    assert_eq!(state.current_episode_index(), 0);
    assert!(!state.has_previous());
    assert!(!state.has_next());
}

/// Derived flags agree with the stored fields after arbitrary operations.
#[test]
fn test_derived_flags_always_consistent() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut state = PlayerState::new();
    let queue: Vec<Episode> = (0..6).map(|i| episode(&i.to_string())).collect();

    for step in 0..500usize {
        match step % 9 {
            0 => state.play_list(queue.clone(), step % queue.len()),
            1 => state.play(episode("solo")),
            2 => state.toggle_play(),
            3 => state.toggle_loop(),
            4 => state.toggle_shuffle(),
            5 => state.clear_player_state(),
            6 => state.play_previous(),
            7 => state.play_next(&mut rng),
            _ => state.set_playing_state(step % 2 == 0),
        }

        let len = state.episode_list().len();
        let index = state.current_episode_index();
        assert_eq!(state.has_previous(), index > 0);
        assert_eq!(state.has_next(), state.is_shuffling() || index + 1 < len);
        if len > 0 {
            assert!(index < len);
        } else {
            assert_eq!(index, 0);
        }
    }
}

/// Homepage rows map onto the shared queue the same way for both sections.
#[test]
fn test_homepage_to_player() {
    let episodes: Vec<Episode> = (0..12).map(|i| episode(&format!("ep-{}", i))).collect();
    let listing = HomeListing::from_episodes(episodes, 2);
    let player = player();

    player.play_list(listing.queue(), listing.queue_index_all(3));

    let state = player.state();
    assert_eq!(state.episode_list().len(), 12);
    assert_eq!(state.current_episode(), Some(&listing.all[3]));
}

/// Every consumer sees the same player.
#[test]
fn test_views_share_one_player() {
    let player = player();
    let home = player.clone();
    let detail = player.clone();
    let mut bar = player.subscribe();

    home.play_list(vec![episode("a"), episode("b")], 0);
    detail.toggle_loop();

    assert!(bar.has_changed().unwrap());
    let seen = bar.borrow_and_update().clone();
    assert!(seen.is_looping());
    assert_eq!(seen.episode_list().len(), 2);
    assert_eq!(seen, player.state());
}

/// Natural completion walks the queue and clears it after the last episode.
#[test]
fn test_playback_runs_through_queue() {
    let player = player();
    player.play_list(vec![episode("a"), episode("b"), episode("c")], 0);

    assert_eq!(handle_episode_end(&player), EpisodeEnd::Advanced);
    assert_eq!(handle_episode_end(&player), EpisodeEnd::Advanced);
    assert_eq!(handle_episode_end(&player), EpisodeEnd::Cleared);

    let state = player.state();
    assert!(state.episode_list().is_empty());
    assert!(!state.is_playing());
}

/// Backend JSON converts into display-ready episodes.
#[test]
fn test_backend_episode_conversion() {
    let json = r#"{
        "id": "como-virar-lider-desenvolvendo",
        "title": "Como virar líder desenvolvendo",
        "members": "Diego e Richard",
        "published_at": "2021-02-03 19:00:00",
        "thumbnail": "https://example.com/lider.jpg",
        "description": "<p>Liderança técnica</p>",
        "file": { "url": "https://example.com/lider.m4a", "type": "audio/x-m4a", "duration": 5400 }
    }"#;

    let raw: RawEpisode = serde_json::from_str(json).unwrap();
    let episode = Episode::from(raw);

    assert_eq!(episode.duration_as_string, "01:30:00");
    assert_eq!(episode.published_at, "3 fev 21");
    assert_eq!(episode.plain_description(), "Liderança técnica");
}

/// Test config defaults.
#[test]
fn test_config_defaults() {
    let config = Config::new();

    assert_eq!(config.api_url, "http://localhost:3333");
    assert_eq!(config.episode_limit, 12);
    assert_eq!(config.latest_count, 2);
}
