use serde::Serialize;
use sqlx::FromRow;
use sqlx::postgres::PgRow;

use crate::entity::EntityKind;

mod academy;
mod coach;
mod player;
mod player_profile;
mod user;

pub use academy::Academy;
pub use coach::Coach;
pub use player::Player;
pub use player_profile::PlayerProfile;
pub use user::User;

/// A table row type, tied to its catalog entry.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin {
    const KIND: EntityKind;
}
