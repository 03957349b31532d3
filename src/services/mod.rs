/// OpenAPI documentation generation.
pub mod documentation;
/// Channel commands: start, guess, quit and puzzle display.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Interception of plain chat messages as guesses.
pub mod message_service;
