use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the color identification service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::command,
        crate::routes::game::message,
        crate::routes::game::get_puzzle,
        crate::routes::game::get_puzzle_image,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CommandRequest,
            crate::dto::game::ChatMessage,
            crate::dto::game::GameReply,
            crate::dto::game::ReplyKind,
            crate::dto::game::PuzzleSummary,
            crate::dto::game::ImagePayload,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Per-channel color identification tests"),
    )
)]
pub struct ApiDoc;
