//! Wire types for the backend HTTP API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata for a single video, as extracted by the backend.
///
/// Replaced wholesale on every fetch; the client never mutates it. Numeric
/// fields default to zero when the extractor omits them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    /// Duration in seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Selectable video resolution cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    P1080,
    P720,
    P480,
    P360,
}

impl Quality {
    /// Wire representation understood by the backend format selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::P1080 => "1080",
            Quality::P720 => "720",
            Quality::P480 => "480",
            Quality::P360 => "360",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best" => Ok(Quality::Best),
            "1080" | "1080p" => Ok(Quality::P1080),
            "720" | "720p" => Ok(Quality::P720),
            "480" | "480p" => Ok(Quality::P480),
            "360" | "360p" => Ok(Quality::P360),
            _ => Err(format!("Unknown quality: {} (best/1080/720/480/360)", s)),
        }
    }
}

impl Serialize for Quality {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Audio bitrate for audio-only downloads (kbps)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioBitrate {
    Kbps320,
    #[default]
    Kbps192,
    Kbps128,
}

impl AudioBitrate {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioBitrate::Kbps320 => "320",
            AudioBitrate::Kbps192 => "192",
            AudioBitrate::Kbps128 => "128",
        }
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioBitrate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "320" => Ok(AudioBitrate::Kbps320),
            "192" => Ok(AudioBitrate::Kbps192),
            "128" => Ok(AudioBitrate::Kbps128),
            _ => Err(format!("Unknown audio bitrate: {} (320/192/128)", s)),
        }
    }
}

impl Serialize for AudioBitrate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The user's current format selection, from which a [`DownloadRequest`] is
/// built per attempt. Quality only matters for video downloads, the bitrate
/// only for audio-only ones; the backend ignores the irrelevant field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatSelection {
    pub audio_only: bool,
    pub quality: Quality,
    pub audio_quality: AudioBitrate,
}

/// Body of `POST /api/download`. Constructed fresh per attempt; not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: Quality,
    pub audio_only: bool,
    pub audio_quality: AudioBitrate,
}

impl DownloadRequest {
    pub fn new(url: String, selection: FormatSelection) -> Self {
        Self {
            url,
            quality: selection.quality,
            audio_only: selection.audio_only,
            audio_quality: selection.audio_quality,
        }
    }
}

/// One completed download, as recorded by the backend. Read-only.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub format_type: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    /// ISO-8601 local timestamp from the backend
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Acknowledgement body for `POST /api/download`. Carries no completion
/// information; actual progress arrives on the status channel.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
