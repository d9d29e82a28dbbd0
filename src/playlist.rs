use std::collections::HashSet;

use crate::track::Track;

pub const MAX_PLAYLIST: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("A playlist can hold at most {0} tracks!")]
    Full(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// The user's working playlist: unique by track id, at most [`MAX_PLAYLIST`] entries,
/// in the order tracks were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a playlist from stored tracks, dropping repeated ids and anything past capacity.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut seen = HashSet::new();
        let tracks = tracks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .take(MAX_PLAYLIST)
            .collect();
        Self { tracks }
    }

    pub fn toggle(&mut self, track: Track) -> Result<Toggle, PlaylistError> {
        if let Some(pos) = self.position(&track.id) {
            self.tracks.remove(pos);
            return Ok(Toggle::Removed);
        }
        if self.is_full() {
            return Err(PlaylistError::Full(MAX_PLAYLIST));
        }
        self.tracks.push(track);
        Ok(Toggle::Added)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tracks.len() >= MAX_PLAYLIST
    }

    pub fn remaining(&self) -> usize {
        MAX_PLAYLIST.saturating_sub(self.tracks.len())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::sample_track;

    fn filled(n: usize) -> Playlist {
        let mut playlist = Playlist::new();
        for i in 0..n {
            playlist.toggle(sample_track(&format!("t{i}"))).unwrap();
        }
        playlist
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut playlist = filled(3);
        let before = playlist.clone();

        assert_eq!(playlist.toggle(sample_track("x")), Ok(Toggle::Added));
        assert!(playlist.contains("x"));
        assert_eq!(playlist.toggle(sample_track("x")), Ok(Toggle::Removed));
        assert_eq!(playlist, before);

        assert_eq!(playlist.toggle(sample_track("t1")), Ok(Toggle::Removed));
        assert_eq!(playlist.toggle(sample_track("t1")), Ok(Toggle::Added));
        assert!(playlist.contains("t1"));
    }

    #[test]
    fn added_tracks_go_to_the_end() {
        let mut playlist = filled(2);
        playlist.toggle(sample_track("t0")).unwrap();
        playlist.toggle(sample_track("t0")).unwrap();
        let ids: Vec<_> = playlist.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t0"]);
    }

    #[test]
    fn eleventh_track_is_rejected() {
        let mut playlist = filled(MAX_PLAYLIST);
        assert!(playlist.is_full());
        assert_eq!(playlist.remaining(), 0);

        let before = playlist.clone();
        assert_eq!(
            playlist.toggle(sample_track("extra")),
            Err(PlaylistError::Full(MAX_PLAYLIST))
        );
        assert_eq!(playlist, before);

        // removal still works at capacity
        assert_eq!(playlist.toggle(sample_track("t4")), Ok(Toggle::Removed));
        assert_eq!(playlist.remaining(), 1);
    }

    #[test]
    fn rehydration_truncates_and_dedups() {
        let mut stored: Vec<Track> = (0..15).map(|i| sample_track(&format!("t{i}"))).collect();
        stored.insert(1, sample_track("t0"));

        let playlist = Playlist::from_tracks(stored);
        assert_eq!(playlist.len(), MAX_PLAYLIST);
        assert_eq!(playlist.tracks()[0].id, "t0");
        assert_eq!(playlist.tracks()[1].id, "t1");
        assert_eq!(playlist.tracks()[9].id, "t9");
    }

    #[test]
    fn clear_empties() {
        let mut playlist = filled(4);
        playlist.clear();
        assert!(playlist.is_empty());
        assert_eq!(playlist.remaining(), MAX_PLAYLIST);
    }
}
