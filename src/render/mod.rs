//! Rendering collaborator turning a [`Puzzle`] into an image.
//!
//! Rendering runs after a request has been applied to the session store and never mutates
//! the puzzle it is given.

pub mod svg;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::state::puzzle::Puzzle;

pub use self::svg::SvgRenderer;

/// Result alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Error raised by rendering backends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend cannot be used at all.
    #[error("rendering backend unavailable: {0}")]
    Unavailable(String),
    /// The backend failed to produce an image for this puzzle.
    #[error("failed to render puzzle: {0}")]
    Failed(String),
}

/// Image produced for a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// MIME type of `data`.
    pub content_type: &'static str,
    pub data: String,
}

/// Abstraction over the component drawing puzzles for players.
pub trait PuzzleRenderer: Send + Sync {
    fn render(&self, puzzle: &Puzzle) -> BoxFuture<'static, RenderResult<RenderedImage>>;
}
