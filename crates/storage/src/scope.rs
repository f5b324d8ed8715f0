//! Tenant and role scoping for every data-access call.
//!
//! An [`AuthScope`] is built once per request from the identity service's
//! session and passed explicitly to every repository method. Reads are
//! narrowed to the scope's tenant; writes are checked against the role grants
//! in [`crate::policy`] and, for existing rows, against the row's tenant.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::policy;
use crate::query::StructuredQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("not permitted to {operation} {entity}")]
    OperationDenied {
        entity: EntityKind,
        operation: Operation,
    },

    #[error("{entity} {id} belongs to another tenant")]
    ForeignTenant { entity: EntityKind, id: Uuid },
}

/// The caller's identity, tenant and roles.
#[derive(Debug, Clone)]
pub struct AuthScope {
    user_id: String,
    tenant_id: Uuid,
    roles: Vec<String>,
}

impl AuthScope {
    pub fn new(user_id: impl Into<String>, tenant_id: Uuid, roles: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id,
            roles,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Reads are always allowed and narrowed to the tenant instead.
    pub fn can(&self, entity: EntityKind, operation: Operation) -> bool {
        operation == Operation::Read
            || self
                .roles
                .iter()
                .any(|role| policy::grants(role, entity, operation))
    }

    pub fn authorize(
        &self,
        entity: EntityKind,
        operation: Operation,
    ) -> Result<(), AuthorizationError> {
        if self.can(entity, operation) {
            Ok(())
        } else {
            Err(AuthorizationError::OperationDenied { entity, operation })
        }
    }

    /// Checks that an existing row, owned by `row_tenant`, is in this scope's tenant.
    pub fn ensure_owned(
        &self,
        entity: EntityKind,
        id: Uuid,
        row_tenant: Uuid,
    ) -> Result<(), AuthorizationError> {
        if row_tenant == self.tenant_id {
            Ok(())
        } else {
            Err(AuthorizationError::ForeignTenant { entity, id })
        }
    }

    pub fn narrow(&self, query: StructuredQuery) -> ScopedQuery {
        ScopedQuery {
            tenant_id: self.tenant_id,
            query,
        }
    }
}

/// A [`StructuredQuery`] restricted to one tenant.
///
/// Only [`AuthScope::narrow`] constructs it, so list queries cannot reach
/// the repository without a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedQuery {
    tenant_id: Uuid,
    query: StructuredQuery,
}

impl ScopedQuery {
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn query(&self) -> &StructuredQuery {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryOptions, translate};

    fn scope(roles: &[&str]) -> AuthScope {
        AuthScope::new(
            "roq-user-1",
            Uuid::new_v4(),
            roles.iter().map(|role| role.to_string()).collect(),
        )
    }

    #[test]
    fn test_reads_need_no_role() {
        let scope = scope(&[]);
        for entity in EntityKind::ALL {
            assert!(scope.authorize(entity, Operation::Read).is_ok());
        }
    }

    #[test]
    fn test_owner_may_write_everything() {
        let scope = scope(&["owner"]);
        for entity in EntityKind::ALL {
            for operation in [Operation::Create, Operation::Update, Operation::Delete] {
                assert!(scope.can(entity, operation), "{operation} {entity}");
            }
        }
    }

    #[test]
    fn test_player_cannot_create_coaches() {
        let err = scope(&["player"])
            .authorize(EntityKind::Coach, Operation::Create)
            .unwrap_err();
        assert_eq!(
            err,
            AuthorizationError::OperationDenied {
                entity: EntityKind::Coach,
                operation: Operation::Create,
            }
        );
        assert_eq!(err.to_string(), "not permitted to create coach");
    }

    #[test]
    fn test_roles_are_combined() {
        let scope = scope(&["player", "coach"]);
        assert!(scope.can(EntityKind::Player, Operation::Create));
        assert!(scope.can(EntityKind::PlayerProfile, Operation::Update));
        assert!(!scope.can(EntityKind::Academy, Operation::Delete));
    }

    #[test]
    fn test_unknown_roles_grant_nothing() {
        let scope = scope(&["superuser"]);
        assert!(!scope.can(EntityKind::User, Operation::Delete));
    }

    #[test]
    fn test_foreign_rows_are_rejected() {
        let scope = scope(&["owner"]);
        let id = Uuid::new_v4();

        assert!(
            scope
                .ensure_owned(EntityKind::Player, id, scope.tenant_id())
                .is_ok()
        );
        assert_eq!(
            scope.ensure_owned(EntityKind::Player, id, Uuid::new_v4()),
            Err(AuthorizationError::ForeignTenant {
                entity: EntityKind::Player,
                id,
            })
        );
    }

    #[test]
    fn test_narrow_keeps_query_and_pins_tenant() {
        let scope = scope(&[]);
        let query = translate(
            &[("filter[status]".to_string(), "active".to_string())],
            EntityKind::Coach,
            &QueryOptions::default(),
        )
        .unwrap();

        let scoped = scope.narrow(query.clone());
        assert_eq!(scoped.tenant_id(), scope.tenant_id());
        assert_eq!(scoped.query(), &query);
    }
}
