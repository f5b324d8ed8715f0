use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::rules::{validate_no_nul, validate_skill_level, validate_status};
use crate::entity::EntityKind;
use crate::mutation::{
    Assignment, Columns, CreateData, NestedBatch, NestedCreate, UpdateData, push_text, push_uuid,
    to_nested_create,
};

/// Request payload for creating a player, optionally with player profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: String,

    #[validate(custom(function = "validate_status"))]
    pub status: String,

    pub user_id: Uuid,

    pub academy_id: Uuid,

    pub coach_id: Uuid,

    #[serde(default)]
    #[validate(nested)]
    pub player_profile: Vec<PlayerProfileInput>,
}

/// A player profile created together with its player
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PlayerProfileInput {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "validate_no_nul"))]
    pub position: String,

    #[validate(custom(function = "validate_skill_level"))]
    pub skill_level: String,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    pub performance_notes: Option<String>,

    pub coach_id: Uuid,
}

/// Request payload for updating an existing player
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    pub user_id: Option<Uuid>,

    pub academy_id: Option<Uuid>,

    pub coach_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerCreateData {
    pub name: String,
    pub status: String,
    pub user_id: Uuid,
    pub academy_id: Uuid,
    pub coach_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_profile: Option<NestedCreate<PlayerProfileInput>>,
}

impl CreatePlayerRequest {
    pub fn into_create_data(self) -> PlayerCreateData {
        PlayerCreateData {
            name: self.name,
            status: self.status,
            user_id: self.user_id,
            academy_id: self.academy_id,
            coach_id: self.coach_id,
            player_profile: to_nested_create(self.player_profile),
        }
    }
}

impl Columns for PlayerCreateData {
    fn columns(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("name", &self.name),
            Assignment::text("status", &self.status),
            Assignment::uuid("user_id", self.user_id),
            Assignment::uuid("academy_id", self.academy_id),
            Assignment::uuid("coach_id", self.coach_id),
        ]
    }
}

impl CreateData for PlayerCreateData {
    fn nested(&self) -> Vec<NestedBatch> {
        self.player_profile
            .as_ref()
            .map(|nested| nested.batch(EntityKind::PlayerProfile, "player_id"))
            .into_iter()
            .collect()
    }
}

impl Columns for PlayerProfileInput {
    fn columns(&self) -> Vec<Assignment> {
        let mut columns = vec![
            Assignment::text("position", &self.position),
            Assignment::text("skill_level", &self.skill_level),
            Assignment::uuid("coach_id", self.coach_id),
        ];
        push_text(&mut columns, "performance_notes", &self.performance_notes);
        columns
    }
}

impl UpdateData for UpdatePlayerRequest {
    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "name", &self.name);
        push_text(&mut assignments, "status", &self.status);
        push_uuid(&mut assignments, "user_id", self.user_id);
        push_uuid(&mut assignments, "academy_id", self.academy_id);
        push_uuid(&mut assignments, "coach_id", self.coach_id);
        assignments
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_profiles_are_nested_under_player_id() {
        let req: CreatePlayerRequest = serde_json::from_value(json!({
            "name": "Leo",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "coach_id": Uuid::new_v4(),
            "player_profile": [{
                "position": "goalkeeper",
                "skill_level": "beginner",
                "performance_notes": "Quick reflexes",
                "coach_id": Uuid::new_v4(),
            }],
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let nested = req.into_create_data().nested();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].parent_column, "player_id");
        assert!(
            nested[0].rows[0]
                .contains(&Assignment::text("performance_notes", "Quick reflexes"))
        );
    }

    #[test]
    fn test_empty_profiles_are_omitted() {
        let req: CreatePlayerRequest = serde_json::from_value(json!({
            "name": "Leo",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "coach_id": Uuid::new_v4(),
            "player_profile": [],
        }))
        .unwrap();

        let data = req.into_create_data();
        assert!(
            serde_json::to_value(&data)
                .unwrap()
                .get("player_profile")
                .is_none()
        );
        assert!(data.nested().is_empty());
    }

    #[test]
    fn test_invalid_skill_level_fails_validation() {
        let req: CreatePlayerRequest = serde_json::from_value(json!({
            "name": "Leo",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "coach_id": Uuid::new_v4(),
            "player_profile": [{
                "position": "goalkeeper",
                "skill_level": "legendary",
                "coach_id": Uuid::new_v4(),
            }],
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_reassigns_coach() {
        let coach = Uuid::new_v4();
        let update = UpdatePlayerRequest {
            coach_id: Some(coach),
            ..UpdatePlayerRequest::default()
        };
        assert_eq!(update.assignments(), vec![Assignment::uuid("coach_id", coach)]);
    }

    #[test]
    fn test_nul_in_name_is_rejected() {
        let req: CreatePlayerRequest = serde_json::from_value(json!({
            "name": "Le\u{0}o",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "coach_id": Uuid::new_v4(),
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
