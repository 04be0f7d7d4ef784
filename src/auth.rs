//! Session tokens and the request extractor for the signed-in user.
//!
//! The identity cookie stores a signed JWT carrying the user's role and
//! name. Requests without a valid token fail extraction with 401, which
//! the shared `RedirectUnauthorized` middleware turns into a redirect.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::access::{AuthenticatedUser, Role};
use crate::models::config::ServerConfig;

/// Sessions outlive one password rotation cycle at most.
pub const SESSION_TTL: Duration = Duration::days(7);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

impl SessionClaims {
    pub fn new(user: &AuthenticatedUser, now: DateTime<Utc>) -> Self {
        let exp = (now + SESSION_TTL).timestamp().max(0) as usize;
        Self {
            sub: user.name.clone(),
            role: user.role,
            exp,
        }
    }
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            role: claims.role,
            name: claims.sub,
        }
    }
}

pub fn issue_token(
    user: &AuthenticatedUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims::new(user, Utc::now());
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims.into())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let token = identity
        .id()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("server config missing"))?;

    decode_token(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected session token: {err}");
        ErrorUnauthorized("session expired")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
