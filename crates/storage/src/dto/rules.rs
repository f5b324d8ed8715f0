//! Field rules shared by several request payloads.

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub(crate) const VALID_STATUSES: &[&str] = &["active", "inactive", "pending", "suspended"];

pub(crate) const VALID_SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced", "elite"];

pub(crate) fn validate_status(status: &str) -> Result<(), ValidationError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_status")
            .with_message("status must be one of active, inactive, pending, suspended".into()))
    }
}

pub(crate) fn validate_skill_level(level: &str) -> Result<(), ValidationError> {
    if VALID_SKILL_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_skill_level").with_message(
            "skill_level must be one of beginner, intermediate, advanced, elite".into(),
        ))
    }
}

/// Postgres text columns cannot store U+0000.
pub(crate) fn validate_no_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        Err(ValidationError::new("nul_character")
            .with_message("must not contain NUL characters".into()))
    } else {
        Ok(())
    }
}

/// Deserializes a present field into `Some`, so `null` reads as `Some(None)`.
/// Paired with `#[serde(default)]`, an absent field stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert!(validate_status("active").is_ok());
        assert!(validate_status("Active").is_err());
        assert!(validate_status("retired").is_err());
    }

    #[test]
    fn test_skill_levels() {
        assert!(validate_skill_level("elite").is_ok());
        assert!(validate_skill_level("pro").is_err());
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        assert!(validate_no_nul("Marta Vidal").is_ok());
        assert!(validate_no_nul("").is_ok());
        assert_eq!(
            validate_no_nul("Mar\u{0}ta").unwrap_err().code,
            "nul_character"
        );
    }
}
