//! Write grants per role.

use crate::entity::EntityKind;
use crate::scope::Operation;

pub const OWNER: &str = "owner";
pub const ACADEMY_MANAGER: &str = "academy-manager";
pub const COACH: &str = "coach";
pub const PLAYER: &str = "player";

/// Whether `role` may perform the write `operation` on `entity`.
///
/// Roles not listed here grant nothing.
pub fn grants(role: &str, entity: EntityKind, operation: Operation) -> bool {
    use EntityKind::*;
    use Operation::*;

    match role {
        OWNER => true,
        ACADEMY_MANAGER => matches!(
            (entity, operation),
            (Academy, Update) | (Coach | Player | PlayerProfile, Create | Update | Delete)
        ),
        COACH => matches!(
            (entity, operation),
            (Player, Create | Update) | (PlayerProfile, Create | Update | Delete)
        ),
        PLAYER => matches!((entity, operation), (PlayerProfile, Update)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academy_manager_grants() {
        assert!(grants(ACADEMY_MANAGER, EntityKind::Academy, Operation::Update));
        assert!(!grants(ACADEMY_MANAGER, EntityKind::Academy, Operation::Delete));
        assert!(grants(ACADEMY_MANAGER, EntityKind::Coach, Operation::Delete));
        assert!(!grants(ACADEMY_MANAGER, EntityKind::User, Operation::Create));
    }

    #[test]
    fn test_coach_grants() {
        assert!(grants(COACH, EntityKind::Player, Operation::Create));
        assert!(!grants(COACH, EntityKind::Player, Operation::Delete));
        assert!(grants(COACH, EntityKind::PlayerProfile, Operation::Delete));
        assert!(!grants(COACH, EntityKind::Coach, Operation::Update));
    }

    #[test]
    fn test_player_grants() {
        assert!(grants(PLAYER, EntityKind::PlayerProfile, Operation::Update));
        assert!(!grants(PLAYER, EntityKind::PlayerProfile, Operation::Create));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        assert!(!grants("Owner", EntityKind::Coach, Operation::Create));
    }
}
