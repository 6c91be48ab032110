use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::user::Role;

const SESSION_DAYS: i64 = 7;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) user_id: Uuid,
    #[serde(default)]
    pub(crate) creator_id: Option<Uuid>,
    #[serde(default)]
    pub(crate) role: Role,
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) cognito_sub: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    #[serde(default)]
    pub(crate) jti: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Session {
    pub(crate) user_id: Uuid,
    pub(crate) creator_id: Option<Uuid>,
    pub(crate) role: Role,
    pub(crate) username: String,
    pub(crate) cognito_sub: String,
}

impl Session {
    pub(crate) fn require(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden(role.as_str()))
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            creator_id: claims.creator_id,
            role: claims.role,
            username: claims.username,
            cognito_sub: claims.cognito_sub,
        }
    }
}

#[derive(Clone)]
pub(crate) struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub(crate) fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub(crate) fn issue(
        &self,
        user_id: Uuid,
        creator_id: Option<Uuid>,
        role: Role,
        username: &str,
    ) -> Result<String, Error> {
        let current_time = Utc::now();
        let expiration_time = current_time + Duration::days(SESSION_DAYS);

        let claims = Claims {
            user_id,
            creator_id,
            role,
            username: username.to_owned(),
            cognito_sub: email_subject(&user_id.to_string()),
            iat: current_time.timestamp(),
            exp: expiration_time.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, Error> {
        Ok(jsonwebtoken::encode(
            &Header::default(),
            claims,
            &self.encoding_key,
        )?)
    }

    pub(crate) fn decode(&self, token: &str) -> Result<Claims, Error> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(Error::ExpiredSession),
                _ => {
                    tracing::debug!("Rejected session token: {}", e);
                    Err(Error::InvalidSession)
                }
            },
        }
    }

    /// Parses an `Authorization` header value of the form `Bearer <token>`.
    pub(crate) fn session_from_header(&self, value: Option<&str>) -> Result<Session, Error> {
        let value = value.ok_or(Error::NoCredentials)?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or(Error::InvalidSession)?;

        Ok(self.decode(token.trim())?.into())
    }
}

/// Subject used for email-registered accounts in place of an identity
/// provider subject.
pub(crate) fn email_subject(value: &str) -> String {
    let digest = hex::encode(Sha256::digest(value.as_bytes()));
    format!("email_{}", &digest[..16])
}

pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| Error::InvalidSession))
        .transpose()?;

    let session = state.session_keys.session_from_header(header)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
