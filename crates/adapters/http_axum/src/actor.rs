//! Extraction of the acting user from gateway headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use fieldhub_domain::actor::{Actor, Role};
use fieldhub_domain::id::UserId;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The [`Actor`] behind the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated(format!("missing {name} header")))
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id: UserId = header(parts, USER_ID_HEADER)?
            .parse()
            .map_err(|_| ApiError::Unauthenticated(format!("invalid {USER_ID_HEADER} header")))?;
        let role: Role = header(parts, USER_ROLE_HEADER)?
            .parse()
            .map_err(|_| ApiError::Unauthenticated(format!("invalid {USER_ROLE_HEADER} header")))?;
        Ok(Self(Actor::new(id, role)))
    }
}
