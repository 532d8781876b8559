//! Caller identity forwarded by the authentication service.
//!
//! The service in front of this API verifies the session and forwards the
//! voter id and role as headers. They are trusted as given.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ballot_types::{Role, VoterId};

use crate::RpcError;

pub const VOTER_ID_HEADER: &str = "x-voter-id";
pub const VOTER_ROLE_HEADER: &str = "x-voter-role";

/// An authenticated caller. A missing role header means [`Role::User`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub id: VoterId,
    pub role: Role,
}

/// A caller holding the admin role. Rejects everyone else with 403.
#[derive(Clone, Debug)]
pub struct Admin(pub Caller);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, RpcError> {
    parts
        .headers
        .get(name)
        .map(|v| {
            v.to_str()
                .map_err(|_| RpcError::Unauthorized(format!("malformed {name} header")))
        })
        .transpose()
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header(parts, VOTER_ID_HEADER)?
            .ok_or_else(|| RpcError::Unauthorized("authentication required".to_string()))?;
        let id = VoterId::new(raw)
            .map_err(|_| RpcError::Unauthorized(format!("malformed {VOTER_ID_HEADER} header")))?;
        let role = match header(parts, VOTER_ROLE_HEADER)? {
            Some(raw) => raw
                .parse()
                .map_err(|_| RpcError::Unauthorized(format!("malformed {VOTER_ROLE_HEADER} header")))?,
            None => Role::User,
        };
        Ok(Self { id, role })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Admin {
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if !caller.role.is_admin() {
            tracing::debug!(voter = %caller.id, "admin route refused");
            return Err(RpcError::Forbidden);
        }
        Ok(Self(caller))
    }
}
