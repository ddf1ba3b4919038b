//! Audio collaborator backed by an external player process.
//!
//! Decoding and output are left to the player (mpv by default). This module
//! only keeps one child process in step with the [`PlayerState`]: it spawns
//! the player for the selected episode while playing, stops it otherwise, and
//! reports when an episode ends on its own so the end-of-episode rule in
//! [`handle_episode_end`] can move the queue along.

use crate::context::PlayerContext;
use crate::error::{AppError, Result};
use crate::player::PlayerState;
use log::{debug, info, warn};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Search for an executable in the system PATH.
///
/// Absolute paths and paths containing a separator are checked directly.
pub fn find_in_path<P: AsRef<Path>>(exe_name: P) -> Option<PathBuf> {
    let exe_path = exe_name.as_ref();

    if exe_path.is_absolute()
        || exe_path
            .to_string_lossy()
            .contains(std::path::MAIN_SEPARATOR)
    {
        return exe_path.is_file().then(|| exe_path.to_path_buf());
    }

    env::var_os("PATH").and_then(|paths| {
        #[cfg(windows)]
        let extensions: Vec<String> = env::var("PATHEXT")
            .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
            .split(';')
            .map(|s| s.to_lowercase())
            .collect();

        env::split_paths(&paths).find_map(|dir| {
            let full_path = dir.join(exe_path);

            if full_path.is_file() {
                return Some(full_path);
            }

            #[cfg(windows)]
            {
                for ext in &extensions {
                    let with_ext = full_path.with_extension(ext.trim_start_matches('.'));
                    if with_ext.is_file() {
                        return Some(with_ext);
                    }
                }
            }

            None
        })
    })
}

/// Get the default audio player for the current operating system.
pub fn default_player() -> Result<(&'static str, Vec<String>)> {
    match env::consts::OS {
        "linux" | "macos" | "freebsd" => Ok(("mpv", vec!["--no-video".to_string()])),
        "windows" => Ok(("mpv.exe", vec!["--no-video".to_string()])),
        other => Err(AppError::Player(format!("OS '{}' is not supported", other))),
    }
}

/// What the end-of-episode rule did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Loop mode: the same episode plays again.
    Replay,
    /// Moved on to another episode in the queue.
    Advanced,
    /// Nothing left to play; the queue was cleared.
    Cleared,
}

/// Apply the end-of-episode rule after natural completion.
///
/// Looping replays without touching the state. Otherwise playback is marked
/// stopped, then the queue advances (and resumes) if there is a next episode
/// or is cleared if there isn't.
pub fn handle_episode_end(player: &PlayerContext) -> EpisodeEnd {
    let state = player.state();

    if state.is_looping() {
        return EpisodeEnd::Replay;
    }

    player.set_playing_state(false);

    if state.has_next() {
        player.play_next();
        player.set_playing_state(true);
        EpisodeEnd::Advanced
    } else {
        player.clear_player_state();
        EpisodeEnd::Cleared
    }
}

/// Owns at most one running player process.
#[derive(Debug)]
pub struct AudioOutput {
    player: String,
    args: Vec<String>,
    child: Option<Child>,
    current_url: Option<String>,
}

impl AudioOutput {
    pub fn new(player: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            player: player.into(),
            args,
            child: None,
            current_url: None,
        }
    }

    /// URL of the episode the running process is playing.
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Bring the process in line with `state`.
    ///
    /// While playing, the selected episode must be the one running; a
    /// different (or missing) process is replaced. When not playing, or with
    /// an empty queue, the process is stopped. Pausing therefore restarts the
    /// episode from the beginning when resumed.
    pub fn sync(&mut self, state: &PlayerState) -> Result<()> {
        match (state.is_playing(), state.current_episode()) {
            (true, Some(episode)) => {
                let up_to_date =
                    self.child.is_some() && self.current_url.as_deref() == Some(episode.url.as_str());
                if !up_to_date {
                    self.stop();
                    self.spawn(&episode.url)?;
                    info!("Playing '{}'", episode.title);
                }
                Ok(())
            }
            _ => {
                self.stop();
                Ok(())
            }
        }
    }

    fn spawn(&mut self, url: &str) -> Result<()> {
        debug!("Spawning {} {:?} {}", self.player, self.args, url);

        let child = Command::new(&self.player)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::Player(format!("failed to start {}: {}", self.player, e)))?;

        self.child = Some(child);
        self.current_url = Some(url.to_string());
        Ok(())
    }

    /// Kill the running process, if any.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("Stopping {}", self.player);
            if let Err(e) = child.kill() {
                debug!("kill: {}", e);
            }
            if let Err(e) = child.wait() {
                debug!("wait: {}", e);
            }
        }
        self.current_url = None;
    }

    /// Check whether the running episode ended on its own.
    ///
    /// Returns `Ok(true)` once after a successful exit and an error if the
    /// player exited with a failure status.
    pub fn poll_finished(&mut self) -> Result<bool> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };

        match child.try_wait() {
            Ok(None) => Ok(false),
            Ok(Some(status)) => {
                self.child = None;
                self.current_url = None;
                if status.success() {
                    debug!("{} finished", self.player);
                    Ok(true)
                } else {
                    Err(AppError::Player(format!(
                        "{} exited with {}",
                        self.player, status
                    )))
                }
            }
            Err(e) => {
                warn!("Could not poll {}: {}", self.player, e);
                self.child = None;
                self.current_url = None;
                Err(AppError::Io(e))
            }
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Episode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::{Duration, Instant};

    fn episode(id: &str, url: &str) -> Episode {
        Episode {
            id: id.to_string(),
            title: id.to_string(),
            members: String::new(),
            thumbnail: String::new(),
            duration: 1,
            url: url.to_string(),
            published_at: String::new(),
            duration_as_string: String::new(),
            description: String::new(),
        }
    }

    fn player() -> PlayerContext {
        PlayerContext::with_rng(StdRng::seed_from_u64(11))
    }

    #[cfg(unix)]
    fn wait_finished(audio: &mut AudioOutput) -> Result<bool> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match audio.poll_finished() {
                Ok(false) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(10))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn test_end_advances_sequentially() {
        let player = player();
        player.play_list(vec![episode("a", "a"), episode("b", "b")], 0);

        assert_eq!(handle_episode_end(&player), EpisodeEnd::Advanced);

        let state = player.state();
        assert_eq!(state.current_episode_index(), 1);
        assert!(state.is_playing());
    }

    #[test]
    fn test_end_of_last_episode_clears_queue() {
        let player = player();
        player.play_list(vec![episode("a", "a"), episode("b", "b")], 1);

        assert_eq!(handle_episode_end(&player), EpisodeEnd::Cleared);

        let state = player.state();
        assert!(state.episode_list().is_empty());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_end_while_looping_replays() {
        let player = player();
        player.play(episode("a", "a"));
        player.toggle_loop();
        let before = player.state();

        assert_eq!(handle_episode_end(&player), EpisodeEnd::Replay);
        assert_eq!(player.state(), before);
    }

    #[test]
    fn test_end_while_shuffling_keeps_playing() {
        let player = player();
        player.play(episode("a", "a"));
        player.toggle_shuffle();

        assert_eq!(handle_episode_end(&player), EpisodeEnd::Advanced);
        assert_eq!(player.state().current_episode_index(), 0);
        assert!(player.state().is_playing());
    }

    #[test]
    fn test_sync_with_missing_player_fails() {
        let mut audio = AudioOutput::new("podcastr-no-such-player", Vec::new());
        let mut state = PlayerState::new();
        state.play(episode("a", "a"));

        assert!(matches!(audio.sync(&state), Err(AppError::Player(_))));
        assert!(!audio.is_running());
    }

    #[test]
    fn test_sync_idle_state_does_nothing() {
        let mut audio = AudioOutput::new("podcastr-no-such-player", Vec::new());
        assert!(audio.sync(&PlayerState::new()).is_ok());
        assert!(!audio.is_running());
        assert!(!audio.poll_finished().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_starts_and_stops_process() {
        // `sleep 30` stands in for a player with a long episode.
        let mut audio = AudioOutput::new("sleep", Vec::new());
        let mut state = PlayerState::new();
        state.play(episode("long", "30"));

        audio.sync(&state).unwrap();
        assert!(audio.is_running());
        assert_eq!(audio.current_url(), Some("30"));
        assert!(!audio.poll_finished().unwrap());

        state.toggle_play();
        audio.sync(&state).unwrap();
        assert!(!audio.is_running());
        assert_eq!(audio.current_url(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_replaces_process_on_new_episode() {
        let mut audio = AudioOutput::new("sleep", Vec::new());
        let mut state = PlayerState::new();
        state.play_list(vec![episode("a", "30"), episode("b", "31")], 0);
        audio.sync(&state).unwrap();

        state.play_next(&mut StdRng::seed_from_u64(1));
        audio.sync(&state).unwrap();
        assert_eq!(audio.current_url(), Some("31"));

        audio.stop();
    }

    #[cfg(unix)]
    #[test]
    fn test_natural_end_is_reported_once() {
        let mut audio = AudioOutput::new("true", Vec::new());
        let mut state = PlayerState::new();
        state.play(episode("a", "a.mp3"));

        audio.sync(&state).unwrap();
        assert!(wait_finished(&mut audio).unwrap());
        assert!(!audio.poll_finished().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_player_is_an_error() {
        let mut audio = AudioOutput::new("false", Vec::new());
        let mut state = PlayerState::new();
        state.play(episode("a", "a.mp3"));

        audio.sync(&state).unwrap();
        assert!(matches!(wait_finished(&mut audio), Err(AppError::Player(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path() {
        assert!(find_in_path("sh").is_some());
        assert!(find_in_path("podcastr-no-such-player").is_none());
        assert!(find_in_path("/definitely/not/here").is_none());
    }
}
