use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::rules::{nullable, validate_no_nul, validate_skill_level};
use crate::mutation::{
    Assignment, Columns, CreateData, UpdateData, push_nullable_text, push_text, push_uuid,
};

/// Request payload for creating a player profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePlayerProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "validate_no_nul"))]
    pub position: String,

    #[validate(custom(function = "validate_skill_level"))]
    pub skill_level: String,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    pub performance_notes: Option<String>,

    pub player_id: Uuid,

    pub coach_id: Uuid,
}

/// Request payload for updating an existing player profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlayerProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "validate_no_nul"))]
    pub position: Option<String>,

    #[validate(custom(function = "validate_skill_level"))]
    pub skill_level: Option<String>,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub performance_notes: Option<Option<String>>,

    pub player_id: Option<Uuid>,

    pub coach_id: Option<Uuid>,
}

impl Columns for CreatePlayerProfileRequest {
    fn columns(&self) -> Vec<Assignment> {
        let mut columns = vec![
            Assignment::text("position", &self.position),
            Assignment::text("skill_level", &self.skill_level),
            Assignment::uuid("player_id", self.player_id),
            Assignment::uuid("coach_id", self.coach_id),
        ];
        push_text(&mut columns, "performance_notes", &self.performance_notes);
        columns
    }
}

impl CreateData for CreatePlayerProfileRequest {}

impl UpdateData for UpdatePlayerProfileRequest {
    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "position", &self.position);
        push_text(&mut assignments, "skill_level", &self.skill_level);
        push_nullable_text(&mut assignments, "performance_notes", &self.performance_notes);
        push_uuid(&mut assignments, "player_id", self.player_id);
        push_uuid(&mut assignments, "coach_id", self.coach_id);
        assignments
    }
}
