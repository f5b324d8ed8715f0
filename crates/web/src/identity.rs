//! Client for the external identity service that resolves a bearer token into
//! the caller's user id, tenant and roles.

use reqwest::StatusCode;
use serde::Deserialize;
use storage::scope::AuthScope;
use thiserror::Error;
use uuid::Uuid;

/// Session as returned by `GET {IDENTITY_SERVICE_URL}/session`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub roq_user_id: String,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<Session> for AuthScope {
    fn from(session: Session) -> Self {
        AuthScope::new(session.roq_user_id, session.tenant_id, session.roles)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing or rejected credentials")]
    Unauthenticated,

    #[error("identity service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity service answered {0}")]
    Unexpected(StatusCode),
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the raw `Authorization` header value into a session.
    async fn session(&self, authorization: &str) -> Result<Session, IdentityError>;
}

pub struct RemoteIdentityProvider {
    session_url: String,
    client: reqwest::Client,
}

impl RemoteIdentityProvider {
    pub fn new(base_url: &str) -> Result<Self, IdentityError> {
        Ok(Self {
            session_url: format!("{}/session", base_url.trim_end_matches('/')),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn session(&self, authorization: &str) -> Result<Session, IdentityError> {
        let response = self
            .client
            .get(&self.session_url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(IdentityError::Unexpected(status));
        }

        Ok(response.json::<Session>().await?)
    }
}

/// Resolves every token to the same session.
#[cfg(test)]
pub struct StaticIdentityProvider {
    session: Session,
}

#[cfg(test)]
impl StaticIdentityProvider {
    pub fn new(tenant_id: Uuid, roles: &[&str]) -> Self {
        Self {
            session: Session {
                roq_user_id: "user-1".to_string(),
                tenant_id,
                roles: roles.iter().map(|role| role.to_string()).collect(),
            },
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn session(&self, _authorization: &str) -> Result<Session, IdentityError> {
        Ok(self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_camel_case() {
        let tenant = Uuid::new_v4();
        let session: Session = serde_json::from_value(serde_json::json!({
            "roqUserId": "roq-42",
            "tenantId": tenant,
            "roles": ["coach"],
        }))
        .unwrap();

        let scope = AuthScope::from(session);
        assert_eq!(scope.user_id(), "roq-42");
        assert_eq!(scope.tenant_id(), tenant);
        assert_eq!(scope.roles(), ["coach".to_string()]);
    }

    #[test]
    fn test_session_url_is_normalized() {
        let provider = RemoteIdentityProvider::new("http://identity.local/").unwrap();
        assert_eq!(provider.session_url, "http://identity.local/session");
    }
}
