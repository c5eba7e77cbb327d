use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::{entities::users, services::user::UserService};
use log::debug;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// The user behind a validated bearer token.
///
/// The OAuth2 layer puts the token claims into the request extensions; the
/// `sub` claim must map to a known user, otherwise the request is rejected
/// with 401.
pub struct CurrentUser(pub users::Model);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let subject = parts
            .extensions
            .get::<DefaultClaims>()
            .and_then(|claims| claims.sub.as_ref())
            .map(|sub| sub.to_string())
            .ok_or(ApiError::Unauthenticated)?;

        match UserService::find_by_subject(&state.db, &subject).await? {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("No user for subject {subject}");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
