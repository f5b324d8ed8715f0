use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Entity;
use crate::entity::EntityKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Academy {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Entity for Academy {
    const KIND: EntityKind = EntityKind::Academy;
}
