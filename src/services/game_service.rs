//! Service helpers driving the per-channel color identification test.

use tracing::{info, warn};

use crate::{
    dto::{
        game::{CommandRequest, GameReply, PuzzleSummary, ReplyKind},
        validation::validate_channel_id,
    },
    error::ServiceError,
    render::RenderedImage,
    state::{SharedState, puzzle::Puzzle, state_machine::Request},
};

/// Apply an explicit command to the session of `channel_id`.
pub async fn handle_command(
    state: &SharedState,
    channel_id: &str,
    command: CommandRequest,
) -> Result<GameReply, ServiceError> {
    ensure_channel_id(channel_id)?;
    execute(state, channel_id, command.to_request(), command.username.as_deref()).await
}

/// Return the puzzle currently running in `channel_id`.
pub async fn current_puzzle(
    state: &SharedState,
    channel_id: &str,
) -> Result<PuzzleSummary, ServiceError> {
    ensure_channel_id(channel_id)?;
    let puzzle = require_puzzle(state, channel_id)?;
    Ok(PuzzleSummary::from(&puzzle))
}

/// Render the puzzle currently running in `channel_id`.
pub async fn render_current_puzzle(
    state: &SharedState,
    channel_id: &str,
) -> Result<RenderedImage, ServiceError> {
    ensure_channel_id(channel_id)?;
    let puzzle = require_puzzle(state, channel_id)?;
    render(state, channel_id, &puzzle).await
}

/// Apply `request`, then render the puzzle the outcome displays.
///
/// The session change is committed before rendering starts: a rendering failure is reported
/// to the caller but does not roll the session back.
pub(crate) async fn execute(
    state: &SharedState,
    channel_id: &str,
    request: Request,
    username: Option<&str>,
) -> Result<GameReply, ServiceError> {
    let outcome = state.apply(channel_id, request);
    let kind = ReplyKind::from(&outcome);
    info!(
        channel = %channel_id,
        kind = ?kind,
        level = outcome.puzzle().map(|puzzle| puzzle.level.value()),
        "request applied"
    );

    let image = match outcome.puzzle() {
        Some(puzzle) => Some(render(state, channel_id, puzzle).await?),
        None => None,
    };

    Ok(GameReply::new(&outcome, username, image))
}

pub(crate) fn ensure_channel_id(channel_id: &str) -> Result<(), ServiceError> {
    validate_channel_id(channel_id).map_err(|err| ServiceError::InvalidInput(err.to_string()))
}

fn require_puzzle(state: &SharedState, channel_id: &str) -> Result<Puzzle, ServiceError> {
    state
        .sessions()
        .current(channel_id)
        .ok_or_else(|| ServiceError::NotFound(format!("no active test in channel `{channel_id}`")))
}

async fn render(
    state: &SharedState,
    channel_id: &str,
    puzzle: &Puzzle,
) -> Result<RenderedImage, ServiceError> {
    state.renderer().render(puzzle).await.map_err(|err| {
        warn!(
            channel = %channel_id,
            puzzle = %puzzle.id,
            error = %err,
            "failed to render puzzle; session already updated"
        );
        ServiceError::Rendering(err)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use futures::{FutureExt, future::BoxFuture};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        config::AppConfig,
        render::{PuzzleRenderer, RenderError, RenderResult, SvgRenderer},
        state::{AppState, puzzle::Level},
    };

    /// Renderer whose backend is always down.
    pub(crate) struct FailingRenderer;

    impl PuzzleRenderer for FailingRenderer {
        fn render(&self, _puzzle: &Puzzle) -> BoxFuture<'static, RenderResult<RenderedImage>> {
            async { Err(RenderError::Unavailable("canvas offline".into())) }.boxed()
        }
    }

    pub(crate) fn test_state(config: AppConfig) -> SharedState {
        AppState::with_parts(config, StdRng::seed_from_u64(17), Arc::new(SvgRenderer::new(32)))
    }

    fn guess(position: &str) -> CommandRequest {
        CommandRequest {
            position: Some(position.into()),
            ..Default::default()
        }
    }

    fn quit() -> CommandRequest {
        CommandRequest {
            quit: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn start_returns_first_puzzle_with_image() {
        let state = test_state(AppConfig::default());

        let reply = handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();

        assert_eq!(reply.kind, ReplyKind::Started);
        let summary = reply.puzzle.unwrap();
        assert_eq!(summary.level, 0);
        assert_eq!(summary.question, 1);
        let image = reply.image.unwrap();
        assert_eq!(image.content_type, "image/svg+xml");
        assert!(image.data.contains(&summary.target));

        let stored = state.sessions().current("general").unwrap();
        assert_eq!(stored.id, summary.id);
    }

    #[tokio::test]
    async fn correct_guess_moves_to_a_new_puzzle_at_next_level() {
        let state = test_state(AppConfig::default());
        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        let first = state.sessions().current("general").unwrap();

        let reply = handle_command(&state, "general", guess(&first.answer.to_string()))
            .await
            .unwrap();

        assert_eq!(reply.kind, ReplyKind::Correct);
        let next = state.sessions().current("general").unwrap();
        assert_eq!(next.level, Level::new(1).unwrap());
        assert_ne!(next.id, first.id);
        assert_eq!(reply.puzzle.map(|summary| summary.id), Some(next.id));
    }

    #[tokio::test]
    async fn wrong_and_malformed_guesses_keep_the_puzzle() {
        let state = test_state(AppConfig::default());
        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        let puzzle = state.sessions().current("general").unwrap();

        let reply = handle_command(&state, "general", guess("c3c")).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::MalformedCoordinate);
        assert!(reply.image.is_none());

        let reply = handle_command(&state, "general", guess("z9")).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::WrongAnswer);

        assert_eq!(state.sessions().current("general"), Some(puzzle));
    }

    #[tokio::test]
    async fn repeating_the_start_command_redisplays() {
        let state = test_state(AppConfig::default());
        let started = handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();

        let reply = handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        assert_eq!(reply.kind, ReplyKind::Prompt);
        assert_eq!(reply.puzzle, started.puzzle);
    }

    #[tokio::test]
    async fn quit_with_and_without_session() {
        let state = test_state(AppConfig::default());

        let reply = handle_command(&state, "general", quit()).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::NoActiveSession);

        let reply = handle_command(&state, "general", guess("a1")).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::NoActiveSession);
        assert!(!state.sessions().is_active("general"));

        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        let reply = handle_command(&state, "general", quit()).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Stopped);
        assert!(!state.sessions().is_active("general"));
    }

    #[tokio::test]
    async fn winning_the_last_level_ends_the_session() {
        let state = test_state(AppConfig::default());
        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();

        for _ in 0..Level::MAX.value() {
            let puzzle = state.sessions().current("general").unwrap();
            let reply = handle_command(&state, "general", guess(&puzzle.answer.to_string()))
                .await
                .unwrap();
            assert_eq!(reply.kind, ReplyKind::Correct);
        }

        let last = state.sessions().current("general").unwrap();
        assert!(last.level.is_max());
        let command = CommandRequest {
            position: Some(last.answer.to_string()),
            username: Some("Ada".into()),
            ..Default::default()
        };
        let reply = handle_command(&state, "general", command).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Won);
        assert!(reply.text.contains("Ada"));
        assert!(state.sessions().is_empty());
    }

    #[tokio::test]
    async fn rendering_failure_is_reported_after_commit() {
        let state = AppState::with_parts(
            AppConfig::default(),
            StdRng::seed_from_u64(17),
            Arc::new(FailingRenderer),
        );

        let err = handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rendering(RenderError::Unavailable(_))));

        // The session started anyway and can be judged.
        let puzzle = state.sessions().current("general").unwrap();
        let reply = handle_command(&state, "general", guess("z9")).await.unwrap();
        assert_eq!(reply.kind, ReplyKind::WrongAnswer);

        let err = handle_command(&state, "general", guess(&puzzle.answer.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rendering(_)));
        assert_eq!(
            state.sessions().current("general").map(|next| next.level),
            Level::new(1)
        );
    }

    #[tokio::test]
    async fn current_puzzle_requires_a_session() {
        let state = test_state(AppConfig::default());
        assert!(matches!(
            current_puzzle(&state, "general").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            render_current_puzzle(&state, "general").await,
            Err(ServiceError::NotFound(_))
        ));

        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        let summary = current_puzzle(&state, "general").await.unwrap();
        let image = render_current_puzzle(&state, "general").await.unwrap();
        assert!(image.data.contains(&summary.target));
    }

    #[tokio::test]
    async fn invalid_channel_is_rejected() {
        let state = test_state(AppConfig::default());
        let err = handle_command(&state, "", CommandRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(state.sessions().is_empty());
    }
}
