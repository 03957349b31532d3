//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted channel identifier.
pub const MAX_CHANNEL_ID_LENGTH: usize = 128;

/// Validates that a channel identifier is non-empty, bounded and free of control characters.
///
/// # Examples
///
/// ```ignore
/// validate_channel_id("guild:1234/general") // Ok
/// validate_channel_id("")                   // Err - empty
/// validate_channel_id("abc\n")              // Err - control character
/// ```
pub fn validate_channel_id(id: &str) -> Result<(), ValidationError> {
    let length = id.chars().count();
    if length == 0 || length > MAX_CHANNEL_ID_LENGTH {
        let mut err = ValidationError::new("channel_id_length");
        err.message = Some(
            format!(
                "Channel ID must be between 1 and {MAX_CHANNEL_ID_LENGTH} characters (got {length})"
            )
            .into(),
        );
        return Err(err);
    }

    if id.chars().any(char::is_control) {
        let mut err = ValidationError::new("channel_id_format");
        err.message = Some("Channel ID must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
