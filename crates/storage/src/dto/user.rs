use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::rules::{nullable, validate_no_nul};
use crate::mutation::{Assignment, Columns, CreateData, UpdateData, push_nullable_text, push_text};

/// Request payload for registering a user record
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(email)]
    #[validate(length(max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub email: String,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "roq_user_id is required"))]
    #[validate(custom(function = "validate_no_nul"))]
    pub roq_user_id: String,
}

/// Request payload for updating an existing user record
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(email)]
    #[validate(length(max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
}

impl Columns for CreateUserRequest {
    fn columns(&self) -> Vec<Assignment> {
        let mut columns = vec![
            Assignment::text("email", &self.email),
            Assignment::text("roq_user_id", &self.roq_user_id),
        ];
        push_text(&mut columns, "first_name", &self.first_name);
        push_text(&mut columns, "last_name", &self.last_name);
        columns
    }
}

impl CreateData for CreateUserRequest {}

impl UpdateData for UpdateUserRequest {
    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "email", &self.email);
        push_nullable_text(&mut assignments, "first_name", &self.first_name);
        push_nullable_text(&mut assignments, "last_name", &self.last_name);
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_validated() {
        let req = CreateUserRequest {
            email: "not-an-email".to_string(),
            first_name: None,
            last_name: None,
            roq_user_id: "roq-1".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_users_have_no_nested_rows() {
        let req = CreateUserRequest {
            email: "ana@example.com".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: None,
            roq_user_id: "roq-1".to_string(),
        };
        assert!(req.validate().is_ok());
        assert!(req.nested().is_empty());
        assert_eq!(
            req.columns(),
            vec![
                Assignment::text("email", "ana@example.com"),
                Assignment::text("roq_user_id", "roq-1"),
                Assignment::text("first_name", "Ana"),
            ]
        );
    }

    #[test]
    fn test_roq_user_id_cannot_be_changed() {
        let result = serde_json::from_str::<UpdateUserRequest>(r#"{"roq_user_id":"other"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_nul_in_text_is_rejected() {
        let req = CreateUserRequest {
            email: "ana@example.com".to_string(),
            first_name: Some("A\u{0}na".to_string()),
            last_name: None,
            roq_user_id: "roq-1".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_names_can_be_cleared() {
        let update: UpdateUserRequest =
            serde_json::from_str(r#"{"first_name":null,"last_name":"Vidal"}"#).unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(
            update.assignments(),
            vec![
                Assignment::null("first_name"),
                Assignment::text("last_name", "Vidal"),
            ]
        );
    }
}
