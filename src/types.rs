//! Type definitions for the podcastr application.
//!
//! This module contains the episode records handed to the player, along with
//! the raw shapes returned by the episodes REST backend.

use crate::format::{duration_to_time_string, format_published_at};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Audio file attached to a raw episode.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    /// Media URL.
    pub url: String,

    /// MIME type, e.g. "audio/x-m4a".
    #[serde(default, rename = "type")]
    pub mime_type: String,

    /// Duration in seconds. Some backends serve it as a string.
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: u64,
}

/// Episode data as returned from the API.
///
/// This struct is used for deserialization and then converted to [`Episode`]
/// with display-ready date and duration strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEpisode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub members: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    pub file: RawFile,
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.max(0.0) as u64),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|n| n.max(0.0) as u64)
            .map_err(serde::de::Error::custom),
    }
}

/// An episode as the player and the UI see it.
///
/// The player only relies on `title`, `members`, `thumbnail`, `duration` and
/// `url`; the remaining fields are for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub members: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Duration in seconds.
    pub duration: u64,
    /// Media URL.
    pub url: String,
    /// Publication date, already formatted for display.
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub duration_as_string: String,
    #[serde(default)]
    pub description: String,
}

impl From<RawEpisode> for Episode {
    fn from(raw: RawEpisode) -> Self {
        Episode {
            published_at: format_published_at(&raw.published_at),
            duration_as_string: duration_to_time_string(raw.file.duration),
            duration: raw.file.duration,
            url: raw.file.url,
            id: raw.id,
            title: raw.title,
            members: raw.members,
            thumbnail: raw.thumbnail,
            description: raw.description,
        }
    }
}

impl Episode {
    /// Format the episode as a single list row.
    ///
    /// # Examples
    ///
    /// ```
    /// use podcastr::types::Episode;
    ///
    /// let ep = Episode {
    ///     id: "a-importancia-da-contribuicao-em-open-source".to_string(),
    ///     title: "A importância da contribuição em Open Source".to_string(),
    ///     members: "Diego e Richard".to_string(),
    ///     thumbnail: String::new(),
    ///     duration: 3981,
    ///     url: "https://example.com/opensource.m4a".to_string(),
    ///     published_at: "8 jan 21".to_string(),
    ///     duration_as_string: "01:06:21".to_string(),
    ///     description: String::new(),
    /// };
    /// assert_eq!(
    ///     ep.to_display(),
    ///     "A importância da contribuição em Open Source | 8 jan 21 | 01:06:21"
    /// );
    /// ```
    pub fn to_display(&self) -> String {
        let mut parts = vec![self.title.as_str()];
        if !self.published_at.is_empty() {
            parts.push(&self.published_at);
        }
        if !self.duration_as_string.is_empty() {
            parts.push(&self.duration_as_string);
        }
        parts.join(" | ")
    }

    /// Description with HTML markup removed, for terminal display.
    pub fn plain_description(&self) -> String {
        strip_html(&self.description)
    }
}

static BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*(br\s*/?|/p|/li|/h[1-6])\s*>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Remove HTML tags and decode entities (named and numeric).
///
/// Block-level closing tags and `<br>` become line breaks.
pub fn strip_html(html: &str) -> String {
    let with_breaks = BREAK_TAG.replace_all(html, "\n");
    let text = TAG.replace_all(&with_breaks, "");

    html_escape::decode_html_entities(&text)
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}
