//! Pure transition table for a channel's game session.

use rand::Rng;

use crate::state::{
    coordinate::Coordinate,
    puzzle::{Level, Puzzle},
};

/// Phase of a single channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// No test is running in the channel.
    NoSession,
    /// A test is running; the puzzle currently shown to players.
    Active(Puzzle),
}

/// Requests a channel can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Start a test. While one is running this shows the current puzzle again.
    Start,
    /// Submit a position. `None` asks for the current puzzle again.
    Guess(Option<String>),
    /// Stop the running test.
    Quit,
}

/// What happened in response to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new test started with this first puzzle.
    Started(Puzzle),
    /// The running puzzle, shown again.
    Prompt(Puzzle),
    /// The position is not a letter and a digit; nothing changed.
    MalformedCoordinate,
    /// The position does not name the answer cell; nothing changed.
    WrongAnswer,
    /// The answer was found; play continues with `next`.
    Correct { next: Puzzle },
    /// The answer of the last level was found; the test is over.
    Won,
    /// Guess or quit without a running test.
    NoActiveSession,
    /// The test was stopped on request.
    Stopped,
}

impl Outcome {
    /// Puzzle that must be displayed alongside this outcome, if any.
    pub fn puzzle(&self) -> Option<&Puzzle> {
        match self {
            Outcome::Started(puzzle) | Outcome::Prompt(puzzle) => Some(puzzle),
            Outcome::Correct { next } => Some(next),
            _ => None,
        }
    }
}

/// Compute the next phase of a channel and the outcome reported to the player.
///
/// New puzzles are generated with `rng`; no other side effect happens here.
pub fn compute_transition<R: Rng + ?Sized>(
    phase: SessionPhase,
    request: Request,
    rng: &mut R,
) -> (SessionPhase, Outcome) {
    match (phase, request) {
        (SessionPhase::NoSession, Request::Start) => {
            let puzzle = Puzzle::generate(Level::FIRST, rng);
            (
                SessionPhase::Active(puzzle.clone()),
                Outcome::Started(puzzle),
            )
        }
        (SessionPhase::NoSession, Request::Guess(_) | Request::Quit) => {
            (SessionPhase::NoSession, Outcome::NoActiveSession)
        }
        (SessionPhase::Active(_), Request::Quit) => (SessionPhase::NoSession, Outcome::Stopped),
        (SessionPhase::Active(puzzle), Request::Start | Request::Guess(None)) => (
            SessionPhase::Active(puzzle.clone()),
            Outcome::Prompt(puzzle),
        ),
        (SessionPhase::Active(puzzle), Request::Guess(Some(position))) => {
            judge(puzzle, &position, rng)
        }
    }
}

fn judge<R: Rng + ?Sized>(
    puzzle: Puzzle,
    position: &str,
    rng: &mut R,
) -> (SessionPhase, Outcome) {
    let Ok(coordinate) = Coordinate::parse(position) else {
        return (
            SessionPhase::Active(puzzle),
            Outcome::MalformedCoordinate,
        );
    };

    if !puzzle.is_answer(coordinate) {
        return (SessionPhase::Active(puzzle), Outcome::WrongAnswer);
    }

    match puzzle.level.next() {
        Some(level) => {
            let next = Puzzle::generate(level, rng);
            (
                SessionPhase::Active(next.clone()),
                Outcome::Correct { next },
            )
        }
        None => (SessionPhase::NoSession, Outcome::Won),
    }
}
