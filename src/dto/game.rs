use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    render::RenderedImage,
    state::{
        puzzle::Puzzle,
        state_machine::{Outcome, Request},
    },
};

/// Name used in replies when the caller does not provide one.
const DEFAULT_USERNAME: &str = "player";

/// Command issued explicitly by a player.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CommandRequest {
    /// Submitted coordinate; omitted (or empty) to start a test or display the current puzzle.
    #[serde(default)]
    pub position: Option<String>,
    /// Stop the running test.
    #[serde(default)]
    pub quit: bool,
    /// Display name of the player, used in congratulation messages.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: Option<String>,
}

impl CommandRequest {
    /// Request for the state machine. Quitting wins over a position.
    pub fn to_request(&self) -> Request {
        if self.quit {
            return Request::Quit;
        }
        match self.position.as_deref().filter(|position| !position.is_empty()) {
            Some(position) => Request::Guess(Some(position.to_owned())),
            None => Request::Start,
        }
    }
}

/// Plain chat message that may be read as a guess.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChatMessage {
    #[validate(length(max = 2000))]
    pub content: String,
    /// The message was sent in a private conversation with the bot.
    #[serde(default)]
    pub direct: bool,
    /// The message mentions the bot.
    #[serde(default)]
    pub mentioned: bool,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: Option<String>,
}

/// Semantic kind of a reply; callers may localize by kind.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Started,
    Prompt,
    MalformedCoordinate,
    WrongAnswer,
    Correct,
    Won,
    NoActiveSession,
    Stopped,
}

impl From<&Outcome> for ReplyKind {
    fn from(value: &Outcome) -> Self {
        match value {
            Outcome::Started(_) => ReplyKind::Started,
            Outcome::Prompt(_) => ReplyKind::Prompt,
            Outcome::MalformedCoordinate => ReplyKind::MalformedCoordinate,
            Outcome::WrongAnswer => ReplyKind::WrongAnswer,
            Outcome::Correct { .. } => ReplyKind::Correct,
            Outcome::Won => ReplyKind::Won,
            Outcome::NoActiveSession => ReplyKind::NoActiveSession,
            Outcome::Stopped => ReplyKind::Stopped,
        }
    }
}

/// Public projection of a puzzle. The answer cell is never exposed.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PuzzleSummary {
    pub id: Uuid,
    /// Difficulty level, starting at 0.
    pub level: u8,
    /// One-based question number.
    pub question: u8,
    pub width: usize,
    pub height: usize,
    /// Target color, `#rrggbb`.
    pub target: String,
    pub background: String,
    pub foreground: String,
    /// Rows of `#rrggbb` colors; rows are labelled `A..`, columns `1..`.
    pub grid: Vec<Vec<String>>,
}

impl From<&Puzzle> for PuzzleSummary {
    fn from(value: &Puzzle) -> Self {
        Self {
            id: value.id,
            level: value.level.value(),
            question: value.level.value() + 1,
            width: value.width,
            height: value.height,
            target: value.base_color.to_string(),
            background: value.background.to_string(),
            foreground: value.foreground.to_string(),
            grid: value
                .grid
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }
}

/// Rendered puzzle attached to a reply.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub content_type: String,
    pub data: String,
}

impl From<RenderedImage> for ImagePayload {
    fn from(value: RenderedImage) -> Self {
        Self {
            content_type: value.content_type.to_string(),
            data: value.data,
        }
    }
}

/// Reply to a command or an intercepted message.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct GameReply {
    pub kind: ReplyKind,
    /// Default English wording of the reply.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl GameReply {
    /// Build the reply for `outcome`, attaching the rendered puzzle when there is one.
    pub fn new(outcome: &Outcome, username: Option<&str>, image: Option<RenderedImage>) -> Self {
        let username = username
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_USERNAME);

        Self {
            kind: outcome.into(),
            text: reply_text(outcome, username),
            puzzle: outcome.puzzle().map(PuzzleSummary::from),
            image: image.map(Into::into),
        }
    }
}

fn reply_text(outcome: &Outcome, username: &str) -> String {
    match outcome {
        Outcome::Started(puzzle) => format!("Test started. {}", prompt(puzzle)),
        Outcome::Prompt(puzzle) => prompt(puzzle),
        Outcome::MalformedCoordinate => {
            "Please enter a coordinate made of a letter and a digit.".into()
        }
        Outcome::WrongAnswer => "Wrong answer.".into(),
        Outcome::Correct { next } => format!(
            "Congratulations {username}, that is correct! On to question {}. {}",
            next.level.value() + 1,
            prompt(next)
        ),
        Outcome::Won => {
            format!("Congratulations {username}, you cleared every level! The test is over.")
        }
        Outcome::NoActiveSession => {
            "No color identification test is running. Send the command without a position to start one."
                .into()
        }
        Outcome::Stopped => "Test stopped.".into(),
    }
}

fn prompt(puzzle: &Puzzle) -> String {
    format!(
        "Enter the coordinate of the color closest to {}.",
        puzzle.base_color
    )
}
