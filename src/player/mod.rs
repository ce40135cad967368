//! Playback/queue state machine for an embedding UI. One controller is
//! constructed per session and passed by reference to whatever needs to
//! query or mutate play state; there is no process-wide "currently playing"
//! variable.

use crate::domain::track::{Track, TrackSource};

#[derive(Default)]
pub struct PlayerController {
    current: Option<Track>,
    playing: bool,
    queue: Vec<Track>,
    recommendations: Vec<Track>,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Starts playing a track, enqueueing it when not already queued.
    pub fn play(&mut self, track: Track) {
        self.play_inner(track, true);
    }

    fn play_inner(&mut self, track: Track, auto_queue: bool) {
        if auto_queue && !self.queue.iter().any(|t| t.id == track.id) {
            self.queue.push(track.clone());
        }
        self.current = Some(track);
        self.playing = true;
    }

    /// Flips play/pause. No-op without a current track; returns the new
    /// playing state.
    pub fn toggle_play(&mut self) -> bool {
        if self.current.is_some() {
            self.playing = !self.playing;
        }
        self.playing
    }

    /// Appends a track to the queue unless a track with the same id is
    /// already queued. Returns whether the queue changed.
    pub fn enqueue(&mut self, track: Track) -> bool {
        if self.queue.iter().any(|t| t.id == track.id) {
            return false;
        }
        self.queue.push(track);
        true
    }

    /// Removes a queued track by id. Returns whether anything was removed.
    pub fn remove(&mut self, track_id: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != track_id);
        self.queue.len() != before
    }

    /// Replaces the pending recommendation list (consumed by `play_next`
    /// when the queue runs dry).
    pub fn set_recommendations(&mut self, recommendations: Vec<Track>) {
        self.recommendations = recommendations;
    }

    pub fn recommendations(&self) -> &[Track] {
        &self.recommendations
    }

    /// Advances playback: wraps around the queue, or, with an empty queue,
    /// consumes the first pending recommendation.
    pub fn play_next(&mut self) -> Option<&Track> {
        if self.queue.is_empty() {
            if self.recommendations.is_empty() {
                return None;
            }
            let next = self.recommendations.remove(0);
            self.play_inner(next, true);
            return self.current();
        }

        let current_index = self.current_queue_index();
        let next_index = match current_index {
            Some(i) => (i + 1) % self.queue.len(),
            None => 0,
        };
        let next = self.queue[next_index].clone();
        self.play_inner(next, false);
        self.current()
    }

    /// Steps back through the queue, wrapping to the tail from the head.
    /// No-op with an empty queue.
    pub fn play_previous(&mut self) -> Option<&Track> {
        if self.queue.is_empty() {
            return None;
        }

        let prev_index = match self.current_queue_index() {
            Some(i) if i > 0 => i - 1,
            _ => self.queue.len() - 1,
        };
        let prev = self.queue[prev_index].clone();
        self.play_inner(prev, false);
        self.current()
    }

    /// Seeking only makes sense for tracks playing from a direct audio URL.
    pub fn seekable(&self) -> bool {
        matches!(
            self.current.as_ref().map(|t| t.source),
            Some(TrackSource::Itunes)
        )
    }

    fn current_queue_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }
}
