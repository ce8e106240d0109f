//! Registration, login and profile self-service.

use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::password::{is_strong_enough, PasswordHasher};
use super::token::TokenService;
use super::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::user::{normalize_email, NewUser, ProfilePatch, PublicUser};
use crate::store::{CredentialStore, StoreError};

/// Orchestrates the credential store, the password hasher and the token service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    tokens: TokenService,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn CredentialStore>, tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    pub async fn register(&self, mut request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let password_hash = self.hasher.hash(request.password).await?;
        let user = self
            .users
            .create(NewUser {
                name: request.name.trim().to_string(),
                email: request.email,
                password_hash,
                bio: None,
            })
            .await
            .map_err(|e| {
                if matches!(e, StoreError::DuplicateEmail) {
                    warn!("registration rejected: email already registered");
                }
                AppError::from(e)
            })?;

        let token = self.tokens.issue(user.id)?;
        info!("user {} registered", user.id);
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Unknown email and wrong password both end in `InvalidCredentials`.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(request.password, user.password_hash.clone())
            .await?
        {
            warn!("login failed: wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!("user {} logged in", user.id);
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<PublicUser, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Applies the fields present in `patch`. Nothing is written when any
    /// check fails, including an email collision.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        mut patch: ProfilePatch,
    ) -> Result<PublicUser, AppError> {
        // An empty email means "leave it as is".
        patch.email = patch
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty());
        patch.validate()?;
        if let Some(password) = &patch.password {
            if !is_strong_enough(password) {
                return Err(AppError::WeakPassword);
            }
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if let Some(name) = patch.name {
            user.name = name.trim().to_string();
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio).filter(|b| !b.is_empty());
        }
        if let Some(email) = patch.email {
            // Same address is a no-op; a different one is checked by the store.
            if email != user.email {
                user.email = email;
            }
        }
        if let Some(password) = patch.password {
            user.password_hash = self.hasher.hash(password).await?;
        }

        let saved = self.users.save(&user).await.map_err(|e| match e {
            StoreError::DuplicateEmail => {
                warn!("profile update for {} rejected: email taken", user_id);
                AppError::EmailTaken
            }
            StoreError::NotFound => AppError::NotFound("User not found".into()),
            other => AppError::from(other),
        })?;

        info!("user {} updated their profile", user_id);
        Ok(saved.into())
    }
}
