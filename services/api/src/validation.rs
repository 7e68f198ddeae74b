//! Input validation
//!
//! Validators collect every violated field into one field-to-message map
//! rather than failing fast, so a 422 response reports all problems at once.

use crate::error::FieldErrors;
use crate::models::{NewUserRequest, VinylPayload};
use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{} is required", field));
        return false;
    }
    true
}

/// Validate a registration request, collecting per-field messages.
pub fn validate_new_user(request: &NewUserRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "firstName", &request.first_name);
    require(&mut errors, "lastName", &request.last_name);
    require(&mut errors, "userName", &request.user_name);

    if require(&mut errors, "email", &request.email) && !email_regex().is_match(&request.email) {
        errors.insert("email".to_string(), "Invalid email format".to_string());
    }

    if require(&mut errors, "plainPass", &request.plain_pass)
        && request.plain_pass.len() < MIN_PASSWORD_LEN
    {
        errors.insert(
            "plainPass".to_string(),
            format!(
                "plainPass must be at least {} characters long",
                MIN_PASSWORD_LEN
            ),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a vinyl create/update payload, collecting per-field messages.
pub fn validate_vinyl(payload: &VinylPayload) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "album", &payload.album);
    require(&mut errors, "artist", &payload.artist);

    if payload.songs < 0 {
        errors.insert(
            "songs".to_string(),
            "songs must not be negative".to_string(),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
