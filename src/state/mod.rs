//! Application state: per-channel sessions, the puzzle generator and the renderer.

pub mod color;
pub mod coordinate;
pub mod puzzle;
pub mod session;
pub mod state_machine;

use std::sync::{Arc, Mutex, PoisonError};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::AppConfig,
    render::{PuzzleRenderer, SvgRenderer},
    state::{
        session::SessionStore,
        state_machine::{Outcome, Request},
    },
};

pub type SharedState = Arc<AppState>;

/// Central application state owning the session store and its collaborators.
pub struct AppState {
    config: AppConfig,
    sessions: SessionStore,
    seeds: Mutex<StdRng>,
    renderer: Arc<dyn PuzzleRenderer>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The generator is seeded from `config.seed` when set, from the OS otherwise, and puzzles
    /// are drawn with the built-in SVG renderer.
    pub fn new(config: AppConfig) -> SharedState {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let renderer = Arc::new(SvgRenderer::new(config.cell_size));
        Self::with_parts(config, rng, renderer)
    }

    /// Construct the state from explicit collaborators.
    pub fn with_parts(
        config: AppConfig,
        rng: StdRng,
        renderer: Arc<dyn PuzzleRenderer>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            sessions: SessionStore::new(),
            seeds: Mutex::new(rng),
            renderer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Running tests keyed by channel.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle to the renderer used to display puzzles.
    pub fn renderer(&self) -> Arc<dyn PuzzleRenderer> {
        self.renderer.clone()
    }

    /// Apply `request` to the session of `channel_id`.
    ///
    /// Each request gets its own generator seeded from the shared one. The shared lock is
    /// released before the channel entry is locked, so channels never wait on each other.
    pub fn apply(&self, channel_id: &str, request: Request) -> Outcome {
        let mut rng = {
            let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
            StdRng::from_rng(&mut *seeds)
        };
        self.sessions.apply(channel_id, request, &mut rng)
    }
}
