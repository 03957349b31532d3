use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{ChatMessage, CommandRequest, GameReply, PuzzleSummary},
    error::AppError,
    services::{game_service, message_service},
    state::SharedState,
};

/// Routes driving the color identification test of a channel.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/channels/{channel_id}/command", post(command))
        .route("/channels/{channel_id}/messages", post(message))
        .route("/channels/{channel_id}/puzzle", get(get_puzzle))
        .route("/channels/{channel_id}/puzzle/image", get(get_puzzle_image))
}

/// Start a test, submit a position or stop the test.
#[utoipa::path(
    post,
    path = "/channels/{channel_id}/command",
    tag = "game",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Outcome of the command", body = GameReply),
        (status = 400, description = "Invalid channel or payload"),
        (status = 500, description = "Renderer failed on the puzzle; the session was updated"),
        (status = 503, description = "Puzzle could not be rendered; the session was updated")
    )
)]
pub async fn command(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
    Json(payload): Json<CommandRequest>,
) -> Result<Json<GameReply>, AppError> {
    payload.validate()?;
    let reply = game_service::handle_command(&state, &channel_id, payload).await?;
    Ok(Json(reply))
}

/// Offer a plain chat message; coordinates are read as guesses depending on configuration.
#[utoipa::path(
    post,
    path = "/channels/{channel_id}/messages",
    tag = "game",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    request_body = ChatMessage,
    responses(
        (status = 200, description = "Message handled as a guess", body = GameReply),
        (status = 204, description = "Message not meant for the game"),
        (status = 400, description = "Invalid channel or payload"),
        (status = 500, description = "Renderer failed on the puzzle; the session was updated"),
        (status = 503, description = "Puzzle could not be rendered; the session was updated")
    )
)]
pub async fn message(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
    Json(payload): Json<ChatMessage>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let response = match message_service::handle_message(&state, &channel_id, payload).await? {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

/// Return the puzzle currently running in the channel.
#[utoipa::path(
    get,
    path = "/channels/{channel_id}/puzzle",
    tag = "game",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Current puzzle", body = PuzzleSummary),
        (status = 404, description = "No running test")
    )
)]
pub async fn get_puzzle(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Json<PuzzleSummary>, AppError> {
    let summary = game_service::current_puzzle(&state, &channel_id).await?;
    Ok(Json(summary))
}

/// Render the puzzle currently running in the channel.
#[utoipa::path(
    get,
    path = "/channels/{channel_id}/puzzle/image",
    tag = "game",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Rendered puzzle", content_type = "image/svg+xml", body = String),
        (status = 404, description = "No running test"),
        (status = 500, description = "Renderer failed on the puzzle"),
        (status = 503, description = "Rendering backend unavailable")
    )
)]
pub async fn get_puzzle_image(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Response, AppError> {
    let image = game_service::render_current_puzzle(&state, &channel_id).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}
