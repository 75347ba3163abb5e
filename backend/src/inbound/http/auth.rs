//! Token authentication for HTTP handlers.
//!
//! Clients send `Authorization: Token <key>`; the `Bearer` scheme is accepted
//! as well. Handlers take [`AuthenticatedUser`] as an argument and never see
//! the header or the token itself.

use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{AuthToken, Error, User, UserId};

use super::state::HttpState;

const SCHEMES: [&str; 2] = ["token", "bearer"];

/// The active user behind the presented token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// Identifier used to scope every owned query.
    pub fn id(&self) -> &UserId {
        self.0.id()
    }

    /// The full account record.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> User {
        self.0
    }
}

fn credentials_required() -> Error {
    Error::unauthorized("authentication credentials were not provided")
}

fn invalid_token() -> Error {
    Error::unauthorized("invalid token")
}

/// Pull the token out of the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent, and an error when it is
/// present but unusable.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Result<Option<AuthToken>, Error> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| invalid_token())?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or_default().to_ascii_lowercase();
    if !SCHEMES.contains(&scheme.as_str()) {
        return Err(invalid_token());
    }
    let (Some(raw), None) = (parts.next(), parts.next()) else {
        return Err(invalid_token());
    };
    AuthToken::parse(raw).map(Some).ok_or_else(invalid_token)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = token_from_headers(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token? else {
                debug!("request without credentials rejected");
                return Err(credentials_required());
            };
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.authenticator.authenticate(&token).await?;
            Ok(Self(user))
        })
    }
}
