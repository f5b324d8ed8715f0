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

/// Request payload for creating a coach, optionally with players and player profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCoachRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: String,

    #[validate(custom(function = "validate_status"))]
    pub status: String,

    pub user_id: Uuid,

    pub academy_id: Uuid,

    #[serde(default)]
    #[validate(nested)]
    pub player: Vec<CoachPlayerInput>,

    #[serde(default)]
    #[validate(nested)]
    pub player_profile: Vec<CoachPlayerProfileInput>,
}

/// A player created together with its coach
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CoachPlayerInput {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: String,

    #[validate(custom(function = "validate_status"))]
    pub status: String,

    pub user_id: Uuid,

    pub academy_id: Uuid,
}

/// A player profile created together with its coach
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CoachPlayerProfileInput {
    #[validate(length(min = 1, max = 100))]
    #[validate(custom(function = "validate_no_nul"))]
    pub position: String,

    #[validate(custom(function = "validate_skill_level"))]
    pub skill_level: String,

    #[validate(length(max = 2000))]
    #[validate(custom(function = "validate_no_nul"))]
    pub performance_notes: Option<String>,

    pub player_id: Uuid,
}

/// Request payload for updating an existing coach
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCoachRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_no_nul"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    pub user_id: Option<Uuid>,

    pub academy_id: Option<Uuid>,
}

/// Coach create payload with child arrays turned into nested-create instructions
#[derive(Debug, Clone, Serialize)]
pub struct CoachCreateData {
    pub name: String,
    pub status: String,
    pub user_id: Uuid,
    pub academy_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<NestedCreate<CoachPlayerInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_profile: Option<NestedCreate<CoachPlayerProfileInput>>,
}

impl CreateCoachRequest {
    pub fn into_create_data(self) -> CoachCreateData {
        CoachCreateData {
            name: self.name,
            status: self.status,
            user_id: self.user_id,
            academy_id: self.academy_id,
            player: to_nested_create(self.player),
            player_profile: to_nested_create(self.player_profile),
        }
    }
}

impl Columns for CoachCreateData {
    fn columns(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("name", &self.name),
            Assignment::text("status", &self.status),
            Assignment::uuid("user_id", self.user_id),
            Assignment::uuid("academy_id", self.academy_id),
        ]
    }
}

impl CreateData for CoachCreateData {
    fn nested(&self) -> Vec<NestedBatch> {
        let players = self
            .player
            .as_ref()
            .map(|nested| nested.batch(EntityKind::Player, "coach_id"));
        let profiles = self
            .player_profile
            .as_ref()
            .map(|nested| nested.batch(EntityKind::PlayerProfile, "coach_id"));

        players.into_iter().chain(profiles).collect()
    }
}

impl Columns for CoachPlayerInput {
    fn columns(&self) -> Vec<Assignment> {
        vec![
            Assignment::text("name", &self.name),
            Assignment::text("status", &self.status),
            Assignment::uuid("user_id", self.user_id),
            Assignment::uuid("academy_id", self.academy_id),
        ]
    }
}

impl Columns for CoachPlayerProfileInput {
    fn columns(&self) -> Vec<Assignment> {
        let mut columns = vec![
            Assignment::text("position", &self.position),
            Assignment::text("skill_level", &self.skill_level),
            Assignment::uuid("player_id", self.player_id),
        ];
        push_text(&mut columns, "performance_notes", &self.performance_notes);
        columns
    }
}

impl UpdateData for UpdateCoachRequest {
    fn assignments(&self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        push_text(&mut assignments, "name", &self.name);
        push_text(&mut assignments, "status", &self.status);
        push_uuid(&mut assignments, "user_id", self.user_id);
        push_uuid(&mut assignments, "academy_id", self.academy_id);
        assignments
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(body: serde_json::Value) -> CreateCoachRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_empty_child_arrays_are_omitted() {
        let req = request(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "player": [{
                "name": "Leo",
                "status": "active",
                "user_id": Uuid::new_v4(),
                "academy_id": Uuid::new_v4(),
            }],
            "player_profile": [],
        }));
        assert!(req.validate().is_ok());

        let data = req.into_create_data();
        let payload = serde_json::to_value(&data).unwrap();

        assert!(payload.get("player_profile").is_none());
        assert_eq!(payload["player"]["create"].as_array().unwrap().len(), 1);
        assert_eq!(payload["player"]["create"][0]["name"], "Leo");

        let nested = data.nested();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].entity, EntityKind::Player);
        assert_eq!(nested[0].parent_column, "coach_id");
        assert_eq!(nested[0].rows.len(), 1);
        assert!(nested.iter().all(|batch| batch.entity != EntityKind::PlayerProfile));
    }

    #[test]
    fn test_missing_child_arrays_are_omitted() {
        let data = request(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
        }))
        .into_create_data();

        let payload = serde_json::to_value(&data).unwrap();
        assert!(payload.get("player").is_none());
        assert!(payload.get("player_profile").is_none());
        assert!(data.nested().is_empty());
    }

    #[test]
    fn test_both_child_arrays_become_batches() {
        let data = request(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "player": [{
                "name": "Leo",
                "status": "active",
                "user_id": Uuid::new_v4(),
                "academy_id": Uuid::new_v4(),
            }],
            "player_profile": [{
                "position": "striker",
                "skill_level": "advanced",
                "player_id": Uuid::new_v4(),
            }],
        }))
        .into_create_data();

        let nested = data.nested();
        assert_eq!(
            nested.iter().map(|batch| batch.entity).collect::<Vec<_>>(),
            vec![EntityKind::Player, EntityKind::PlayerProfile]
        );
        // unset optional columns are left to the column default
        assert!(
            nested[1].rows[0]
                .iter()
                .all(|assignment| assignment.column != "performance_notes")
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_value::<CreateCoachRequest>(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "tenant_id": Uuid::new_v4(),
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_fields_are_rejected() {
        let result = serde_json::from_value::<CreateCoachRequest>(json!({ "name": "X" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_rows_are_validated() {
        let req = request(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "player": [{
                "name": "",
                "status": "retired",
                "user_id": Uuid::new_v4(),
                "academy_id": Uuid::new_v4(),
            }],
        }));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_assigns_only_provided_fields() {
        let update = UpdateCoachRequest {
            status: Some("inactive".to_string()),
            ..UpdateCoachRequest::default()
        };
        assert_eq!(
            update.assignments(),
            vec![Assignment::text("status", "inactive")]
        );
        assert!(UpdateCoachRequest::default().assignments().is_empty());
    }

    #[test]
    fn test_nul_in_nested_text_is_rejected() {
        let req = request(json!({
            "name": "X",
            "status": "active",
            "user_id": Uuid::new_v4(),
            "academy_id": Uuid::new_v4(),
            "player_profile": [{
                "position": "striker",
                "skill_level": "advanced",
                "performance_notes": "quick\u{0}feet",
                "player_id": Uuid::new_v4(),
            }],
        }));
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("player_profile"));

        let update = UpdateCoachRequest {
            name: Some("Mar\u{0}ta".to_string()),
            ..UpdateCoachRequest::default()
        };
        assert!(update.validate().is_err());
    }
}
