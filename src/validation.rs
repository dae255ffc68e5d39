//! Input checks shared by the trigger and profile routes.

use crate::config::MediaConfig;
use crate::constants::MAX_TRIGGER_NAME_LEN;

/// Trimmed name must be non-empty and at most 100 characters.
pub fn validate_trigger_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Trigger name is required");
    }
    if trimmed.chars().count() > MAX_TRIGGER_NAME_LEN {
        return Err("Trigger name must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_trigger_image(payload: &str, media: &MediaConfig) -> Result<(), &'static str> {
    if payload.is_empty() {
        return Err("Image is required");
    }
    if !payload.starts_with("data:image/") {
        return Err("Image must be a data:image/ URL");
    }
    if payload.len() > media.max_image_bytes {
        return Err("Image is too large");
    }
    Ok(())
}

/// The audio limit applies to the decoded size, estimated from the base64 length.
pub fn validate_trigger_audio(payload: &str, media: &MediaConfig) -> Result<(), &'static str> {
    if payload.is_empty() {
        return Err("Audio is required");
    }
    if !payload.starts_with("data:audio/") {
        return Err("Audio must be a data:audio/ URL");
    }
    if estimated_decoded_len(payload) > media.max_audio_bytes {
        return Err("Audio is too large");
    }
    Ok(())
}

pub fn validate_profile_photo(payload: &str, media: &MediaConfig) -> Result<(), &'static str> {
    if !payload.starts_with("data:image/") {
        return Err("Photo must be a data:image/ URL");
    }
    if payload.len() > media.max_profile_photo_bytes {
        return Err("Photo is too large");
    }
    Ok(())
}

fn estimated_decoded_len(encoded: &str) -> usize {
    encoded.len() / 4 * 3
}
