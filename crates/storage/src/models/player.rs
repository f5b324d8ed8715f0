use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Entity;
use crate::entity::EntityKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub user_id: Uuid,
    pub academy_id: Uuid,
    pub coach_id: Uuid,
    pub tenant_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Entity for Player {
    const KIND: EntityKind = EntityKind::Player;
}
