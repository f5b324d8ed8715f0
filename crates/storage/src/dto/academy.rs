use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::rules::{nullable, validate_no_nul, validate_status};
use crate::entity::EntityKind;
use crate::mutation::{
    Assignment, Columns, CreateData, NestedBatch, NestedCreate, UpdateData, push_nullable_text,
    push_text, push_uuid, to_nested_create,
};

/// Request payload for creating an academy, optionally with coaches
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAcademyRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: String,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    pub description: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    #[validate(custom(function = "validate_no_nul"))]
    pub image: Option<String>,

    pub user_id: Uuid,

    #[serde(default)]
    #[validate(nested)]
    pub coach: Vec<AcademyCoachInput>,
}

/// A coach created together with its academy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AcademyCoachInput {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: String,

    #[validate(custom(function = "validate_status"))]
    pub status: String,

    pub user_id: Uuid,
}

/// Request payload for updating an existing academy
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAcademyRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(url)]
    #[validate(length(max = 500))]
    #[validate(custom(function = "validate_no_nul"))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,

    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcademyCreateData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<NestedCreate<AcademyCoachInput>>,
}

impl CreateAcademyRequest {
    pub fn into_create_data(self) -> AcademyCreateData {
        AcademyCreateData {
            name: self.name,
            description: self.description,
            image: self.image,
            user_id: self.user_id,
            coach: to_nested_create(self.coach),
        }
    }
}

impl Columns for AcademyCreateData {
    fn columns(&self) -> Vec<Assignment> {
        let mut columns = vec![
            Assignment::text("name", &self.name),
            Assignment::uuid("user_id", self.user_id),
        ];
        push_text(&mut columns, "description", &self.description);
        push_text(&mut columns, "image", &self.image);
        columns
    }
}

impl CreateData for AcademyCreateData {
    fn nested(&self) -> Vec<NestedBatch> {
        self.coach
            .as_ref()
            .map(|nested| nested.batch(EntityKind::Coach, "academy_id"))
            .into_iter()
            .collect()
    }
}

impl Columns for AcademyCoachInput {
    fn columns(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("name", &self.name),
            Assignment::text("status", &self.status),
            Assignment::uuid("user_id", self.user_id),
        ]
    }
}

impl UpdateData for UpdateAcademyRequest {
    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "name", &self.name);
        push_nullable_text(&mut assignments, "description", &self.description);
        push_nullable_text(&mut assignments, "image", &self.image);
        push_uuid(&mut assignments, "user_id", self.user_id);
        assignments
    }
}
