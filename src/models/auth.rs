//! Identity of the signed-in administrator.
//!
//! The auth service stores a signed JWT as the actix-identity id. Handlers
//! take [`AuthenticatedUser`] as an extractor; a missing or invalid token
//! turns into a 401 that [`crate::middleware::RedirectUnauthorized`] sends to
//! the sign-in page.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::api::SessionCredentials;
use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Backend session the token below belongs to.
    pub session_id: String,
    /// Bearer token for the REST backend.
    #[serde(default)]
    pub token: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Credentials forwarded with every backend request made for this user.
    pub fn credentials(&self) -> SessionCredentials {
        SessionCredentials {
            token: self.token.clone(),
            user_id: self.sub.clone(),
            session_id: self.session_id.clone(),
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("Server config is not registered");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "server config missing",
            )));
        };

        let token = match req.get_identity().and_then(|identity| identity.id()) {
            Ok(token) => token,
            Err(_) => return ready(Err(actix_web::error::ErrorUnauthorized("not signed in"))),
        };

        ready(AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
            log::warn!("Rejected identity token: {err}");
            actix_web::error::ErrorUnauthorized("invalid token")
        }))
    }
}
