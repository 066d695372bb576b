//! Authentication service - credential checks and session lifecycle.
//!
//! A login creates a server-side [`SessionIdentity`] and hands the client
//! a signed token naming it. Requests authenticate only when the token
//! verifies, its session record is still present and the account is still
//! active in the same role. Logout, expiry, deactivation or a role change
//! each end a session regardless of the token's own expiry.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user_service::NewAccount;
use crate::config::Config;
use crate::domain::{Password, SessionIdentity, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{SessionStore, UnitOfWork};

/// Signed token payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Server-side session id
    pub sid: String,
    pub role: UserRole,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Successful login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub role: UserRole,
    /// Where the client should navigate next
    #[schema(example = "/student/dashboard")]
    pub redirect_hint: String,
    #[schema(example = "Ana Cruz")]
    pub display_name: String,
    /// Same token as the session cookie, for non-browser clients
    pub access_token: String,
    /// Token lifetime in seconds
    #[schema(example = 2592000)]
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and open a session.
    async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse>;

    /// Self-registration for students and guests
    async fn register(&self, account: NewAccount) -> AppResult<User>;

    /// Resolve a presented token to its live session.
    ///
    /// Sessions of deactivated or re-roled accounts are revoked here.
    async fn resolve_session(&self, token: &str) -> AppResult<SessionIdentity>;

    /// Revoke a session. Revoking an unknown session succeeds.
    async fn logout(&self, session_id: &str) -> AppResult<()>;

    /// Session lifetime in seconds, for cookie Max-Age
    fn session_ttl_seconds(&self) -> i64;
}

fn issue_token(session: &SessionIdentity, config: &Config) -> AppResult<String> {
    let claims = Claims {
        sub: session.user_id,
        sid: session.session_id.clone(),
        role: session.role,
        name: session.display_name.clone(),
        exp: session.expires_at.timestamp(),
        iat: session.issued_at.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret_bytes()),
    )?)
}

fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    sessions: Arc<dyn SessionStore>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, sessions: Arc<dyn SessionStore>, config: Config) -> Self {
        Self {
            uow,
            sessions,
            config,
        }
    }

    async fn open_session(&self, user: &User) -> AppResult<SessionIdentity> {
        let now = Utc::now();
        let session = SessionIdentity {
            session_id: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            role: user.role,
            display_name: user.display_name(),
            issued_at: now,
            expires_at: now + Duration::seconds(self.config.session_ttl_seconds()),
        };

        self.sessions.save(&session).await?;
        Ok(session)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let user = match self.uow.users().find_active_by_username(username).await? {
            Some(user) => user,
            None => {
                Password::verify_against_dummy(password);
                tracing::debug!(username, "Login rejected: unknown or inactive user");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !Password::from_hash(user.password_hash.as_str()).verify(password) {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let session = self.open_session(&user).await?;
        let access_token = issue_token(&session, &self.config)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            success: true,
            role: user.role,
            redirect_hint: user.role.landing_route().to_string(),
            display_name: session.display_name,
            access_token,
            expires_in: self.config.session_ttl_seconds(),
        })
    }

    async fn register(&self, account: NewAccount) -> AppResult<User> {
        if !account.role.is_self_registrable() {
            return Err(AppError::validation(format!(
                "Accounts with role '{}' are created by an administrator",
                account.role
            )));
        }

        let user = self.uow.users().create(account.into_new_user()?).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn resolve_session(&self, token: &str) -> AppResult<SessionIdentity> {
        let claims = verify_token(token, &self.config)?;

        let session = self
            .sessions
            .find(&claims.sid)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.user_id != claims.sub {
            tracing::warn!(session_id = %claims.sid, "Token subject does not match session");
            return Err(AppError::Unauthorized);
        }

        // The account may have been deactivated or re-roled since login.
        let current = self.uow.users().find_by_id(session.user_id).await?;
        match current {
            Some(user) if user.is_active && user.role == session.role => Ok(session),
            _ => {
                self.sessions.revoke(&session.session_id).await?;
                tracing::info!(
                    user_id = %session.user_id,
                    session_id = %session.session_id,
                    "Session ended: account no longer active in this role"
                );
                Err(AppError::Unauthorized)
            }
        }
    }

    async fn logout(&self, session_id: &str) -> AppResult<()> {
        self.sessions.revoke(session_id).await?;
        tracing::info!(session_id, "Session revoked");
        Ok(())
    }

    fn session_ttl_seconds(&self) -> i64 {
        self.config.session_ttl_seconds()
    }
}
