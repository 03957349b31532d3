//! Per-channel session storage.

use dashmap::{DashMap, mapref::entry::Entry};
use rand::Rng;

use crate::state::{
    puzzle::Puzzle,
    state_machine::{Outcome, Request, SessionPhase, compute_transition},
};

/// Running tests keyed by channel identifier.
///
/// Each request reads, decides and writes its channel entry while holding the entry lock, so
/// two requests for the same channel never interleave. Channels are fully independent.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Puzzle>,
}

impl SessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `request` to the session of `channel_id` and return the outcome.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        channel_id: &str,
        request: Request,
        rng: &mut R,
    ) -> Outcome {
        match self.sessions.entry(channel_id.to_owned()) {
            Entry::Occupied(mut entry) => {
                let phase = SessionPhase::Active(entry.get().clone());
                let (next, outcome) = compute_transition(phase, request, rng);
                match next {
                    SessionPhase::Active(puzzle) => {
                        if puzzle.id != entry.get().id {
                            entry.insert(puzzle);
                        }
                    }
                    SessionPhase::NoSession => {
                        entry.remove();
                    }
                }
                outcome
            }
            Entry::Vacant(entry) => {
                let (next, outcome) = compute_transition(SessionPhase::NoSession, request, rng);
                if let SessionPhase::Active(puzzle) = next {
                    entry.insert(puzzle);
                }
                outcome
            }
        }
    }

    /// Snapshot of the puzzle running in `channel_id`.
    pub fn current(&self, channel_id: &str) -> Option<Puzzle> {
        self.sessions.get(channel_id).map(|entry| entry.value().clone())
    }

    /// Whether a test is running in `channel_id`.
    pub fn is_active(&self, channel_id: &str) -> bool {
        self.sessions.contains_key(channel_id)
    }

    /// Number of channels with a running test.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no channel has a running test.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
