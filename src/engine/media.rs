//! Media stream types exchanged with the effects engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a media track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// An ordered bundle of tracks fed into or produced by an engine
///
/// `T` is whatever handle the media pipeline uses for a track.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaStream<T> {
    tracks: Vec<(MediaKind, T)>,
}

impl<T> MediaStream<T> {
    /// Create an empty stream
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Wrap a single track
    pub fn from_track(kind: MediaKind, track: T) -> Self {
        Self {
            tracks: vec![(kind, track)],
        }
    }

    /// Append a track
    pub fn add_track(&mut self, kind: MediaKind, track: T) {
        self.tracks.push((kind, track));
    }

    /// Video tracks in insertion order
    pub fn video_tracks(&self) -> impl Iterator<Item = &T> {
        self.tracks
            .iter()
            .filter(|(kind, _)| *kind == MediaKind::Video)
            .map(|(_, track)| track)
    }

    /// First video track, if any
    pub fn first_video_track(&self) -> Option<&T> {
        self.tracks
            .iter()
            .find(|(kind, _)| *kind == MediaKind::Video)
            .map(|(_, track)| track)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl<T> Default for MediaStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_tracks_skip_audio() {
        let mut stream = MediaStream::from_track(MediaKind::Audio, "mic");
        stream.add_track(MediaKind::Video, "cam");
        stream.add_track(MediaKind::Video, "screen");

        let video: Vec<_> = stream.video_tracks().copied().collect();
        assert_eq!(video, vec!["cam", "screen"]);
        assert_eq!(stream.first_video_track(), Some(&"cam"));
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(format!("{}", MediaKind::Video), "video");
        assert_eq!(format!("{}", MediaKind::Audio), "audio");
    }
}
