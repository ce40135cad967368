//! Named playlists persisted to a single JSON file, read once at open and
//! rewritten in full on every mutation. A missing or incompatible file is
//! treated as an empty store rather than an error; there is no migration
//! across shapes.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::track::Track;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

pub struct PlaylistStore {
    path: PathBuf,
    playlists: Vec<Playlist>,
}

impl PlaylistStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let playlists = Self::read(&path);
        Self { path, playlists }
    }

    fn read(path: &Path) -> Vec<Playlist> {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Vec::new();
        };

        match serde_json::from_str(&contents) {
            Ok(playlists) => playlists,
            Err(e) => {
                log::warn!(
                    "Stored playlists at {} have an incompatible shape ({e}), starting empty",
                    path.display()
                );
                Vec::new()
            }
        }
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn find(&self, name_or_id: &str) -> Option<&Playlist> {
        self.playlists
            .iter()
            .find(|p| p.id == name_or_id || p.name == name_or_id)
    }

    pub fn create(&mut self, name: &str) -> anyhow::Result<&Playlist> {
        let id = self.next_id();
        self.playlists.push(Playlist {
            id,
            name: name.to_string(),
            tracks: Vec::new(),
        });
        self.persist()?;
        Ok(self.playlists.last().expect("playlist just pushed"))
    }

    /// Deletes a playlist by id or name. Returns whether one was removed.
    pub fn delete(&mut self, name_or_id: &str) -> anyhow::Result<bool> {
        let before = self.playlists.len();
        self.playlists
            .retain(|p| p.id != name_or_id && p.name != name_or_id);

        let removed = self.playlists.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Appends a track, deduplicated by track id. Returns false when the
    /// track was already present.
    pub fn add_track(&mut self, name_or_id: &str, track: Track) -> anyhow::Result<bool> {
        let playlist = self
            .playlists
            .iter_mut()
            .find(|p| p.id == name_or_id || p.name == name_or_id)
            .with_context(|| format!("no playlist named {name_or_id}"))?;

        if playlist.tracks.iter().any(|t| t.id == track.id) {
            return Ok(false);
        }

        playlist.tracks.push(track);
        self.persist()?;
        Ok(true)
    }

    pub fn remove_track(&mut self, name_or_id: &str, track_id: &str) -> anyhow::Result<bool> {
        let playlist = self
            .playlists
            .iter_mut()
            .find(|p| p.id == name_or_id || p.name == name_or_id)
            .with_context(|| format!("no playlist named {name_or_id}"))?;

        let before = playlist.tracks.len();
        playlist.tracks.retain(|t| t.id != track_id);

        let removed = playlist.tracks.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Full rewrite of the backing file; no partial or merge writes.
    fn persist(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.playlists)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write playlists to {}", self.path.display()))
    }

    /// Epoch-millis id, bumped until unique within the store.
    fn next_id(&self) -> String {
        let mut millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        while self.playlists.iter().any(|p| p.id == millis.to_string()) {
            millis += 1;
        }
        millis.to_string()
    }
}
