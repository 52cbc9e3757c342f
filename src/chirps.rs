/// Chirp body rules: a length cap and a word filter.

use crate::error::ValidationError;

pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];
const CENSORED: &str = "****";

/// Check the length limit and return the censored body
pub fn validate_chirp(body: &str) -> Result<String, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyField("chirp"));
    }

    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp", MAX_CHIRP_LENGTH));
    }

    Ok(censor_profane(body))
}

/// Replace filtered words with `****`
///
/// Only whole space-separated words match, case-insensitively, so
/// `Sharbert!` is left alone.
pub fn censor_profane(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
