//! Read plain chat messages as guesses when the channel has a running test.

use tracing::debug;

use crate::{
    config::MiddlewareMode,
    dto::game::{ChatMessage, GameReply},
    error::ServiceError,
    services::game_service::{ensure_channel_id, execute},
    state::{SharedState, coordinate::Coordinate, state_machine::Request},
};

/// Handle a chat message, returning `None` when it is not meant for the game.
pub async fn handle_message(
    state: &SharedState,
    channel_id: &str,
    message: ChatMessage,
) -> Result<Option<GameReply>, ServiceError> {
    ensure_channel_id(channel_id)?;

    let Some(position) = intercepted_position(state, channel_id, &message) else {
        return Ok(None);
    };

    debug!(channel = %channel_id, %position, "message read as a guess");
    let reply = execute(
        state,
        channel_id,
        Request::Guess(Some(position)),
        message.username.as_deref(),
    )
    .await?;
    Ok(Some(reply))
}

fn intercepted_position(
    state: &SharedState,
    channel_id: &str,
    message: &ChatMessage,
) -> Option<String> {
    if !state.sessions().is_active(channel_id) {
        return None;
    }

    match state.config().middleware {
        MiddlewareMode::Disabled => return None,
        MiddlewareMode::Restricted if !message.direct && !message.mentioned => return None,
        MiddlewareMode::Restricted | MiddlewareMode::Enabled => {}
    }

    let content = message.content.trim();
    Coordinate::parse(content).ok()?;
    Some(content.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::game::{CommandRequest, ReplyKind},
        services::game_service::{handle_command, tests::test_state},
    };

    fn config(middleware: MiddlewareMode) -> AppConfig {
        AppConfig {
            middleware,
            ..Default::default()
        }
    }

    fn message(content: &str, direct: bool, mentioned: bool) -> ChatMessage {
        ChatMessage {
            content: content.into(),
            direct,
            mentioned,
            username: Some("Ada".into()),
        }
    }

    async fn started(middleware: MiddlewareMode) -> SharedState {
        let state = test_state(config(middleware));
        handle_command(&state, "general", CommandRequest::default())
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn ignored_without_running_test() {
        let state = test_state(config(MiddlewareMode::Enabled));
        let reply = handle_message(&state, "general", message("a1", true, true))
            .await
            .unwrap();
        assert!(reply.is_none());
        assert!(state.sessions().is_empty());
    }

    #[tokio::test]
    async fn disabled_mode_ignores_everything() {
        let state = started(MiddlewareMode::Disabled).await;
        let reply = handle_message(&state, "general", message("a1", true, true))
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn restricted_mode_needs_direct_message_or_mention() {
        let state = started(MiddlewareMode::Restricted).await;

        let reply = handle_message(&state, "general", message("z9", false, false))
            .await
            .unwrap();
        assert!(reply.is_none());

        let reply = handle_message(&state, "general", message("z9", false, true))
            .await
            .unwrap();
        assert_eq!(reply.map(|reply| reply.kind), Some(ReplyKind::WrongAnswer));

        let reply = handle_message(&state, "general", message("z9", true, false))
            .await
            .unwrap();
        assert_eq!(reply.map(|reply| reply.kind), Some(ReplyKind::WrongAnswer));
    }

    #[tokio::test]
    async fn only_coordinates_are_intercepted() {
        let state = started(MiddlewareMode::Enabled).await;

        for chatter in ["hello", "a11", "42", ""] {
            let reply = handle_message(&state, "general", message(chatter, false, false))
                .await
                .unwrap();
            assert!(reply.is_none(), "{chatter:?} should pass through");
        }
    }

    #[tokio::test]
    async fn intercepted_answer_advances_the_test() {
        let state = started(MiddlewareMode::Enabled).await;
        let puzzle = state.sessions().current("general").unwrap();
        let content = format!("  {}  ", puzzle.answer.to_string().to_lowercase());

        let reply = handle_message(&state, "general", message(&content, false, false))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply.kind, ReplyKind::Correct);
        assert!(reply.text.contains("Ada"));
        assert_ne!(state.sessions().current("general").unwrap().id, puzzle.id);
    }
}
