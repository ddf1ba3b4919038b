//! Homepage listing: featured latest episodes followed by the rest.

use crate::types::Episode;

/// Episodes split the way the homepage shows them.
///
/// Both sections play from the same queue, `latest` first, so a row in the
/// "all episodes" section maps to `index + latest.len()` in the queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeListing {
    pub latest: Vec<Episode>,
    pub all: Vec<Episode>,
}

impl HomeListing {
    /// Split newest-first `episodes` into the first `latest_count` and the rest.
    pub fn from_episodes(mut episodes: Vec<Episode>, latest_count: usize) -> Self {
        let split = latest_count.min(episodes.len());
        let all = episodes.split_off(split);
        Self {
            latest: episodes,
            all,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty() && self.all.is_empty()
    }

    pub fn len(&self) -> usize {
        self.latest.len() + self.all.len()
    }

    /// The play queue for the homepage.
    pub fn queue(&self) -> Vec<Episode> {
        self.latest.iter().chain(self.all.iter()).cloned().collect()
    }

    pub fn queue_index_latest(&self, index: usize) -> usize {
        index
    }

    pub fn queue_index_all(&self, index: usize) -> usize {
        index + self.latest.len()
    }
}
