use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Entity;
use crate::entity::EntityKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub position: String,
    pub skill_level: String,
    pub performance_notes: Option<String>,
    pub player_id: Uuid,
    pub coach_id: Uuid,
    pub tenant_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Entity for PlayerProfile {
    const KIND: EntityKind = EntityKind::PlayerProfile;
}
