// src/services/profile_service.rs
//
// The signed-in account: session lifecycle and own-profile operations.

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::domain::user::{
    validate_bio, validate_display_name, validate_email, validate_user, validate_username, User,
};
use crate::domain::{DomainError, DomainResult};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ProfileUpdated, SessionEnded, SessionStarted};
use crate::integrations::api::{LoginBody, RegisterBody, StoryhubApi, UpdateProfileBody};
use crate::repositories::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct ProfileService {
    api: Arc<dyn StoryhubApi>,
    user_repo: Arc<dyn UserRepository>,
    config: Arc<ConfigStore>,
    event_bus: Arc<EventBus>,
}

impl ProfileService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        user_repo: Arc<dyn UserRepository>,
        config: Arc<ConfigStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            api,
            user_repo,
            config,
            event_bus,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.config.session_token().is_some()
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<User> {
        validate_email(&request.email).map_err(AppError::Domain)?;
        validate_password(&request.password).map_err(AppError::Domain)?;

        let session = self
            .api
            .login(LoginBody {
                email: request.email,
                password: request.password,
            })
            .await?;

        let user = session.user.into_user()?;
        self.config.set_session(session.token, user.id)?;
        self.user_repo.mirror_remote(&user)?;

        self.event_bus
            .emit(SessionStarted::new(user.id, user.username.clone()));

        Ok(user)
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        validate_username(&request.username).map_err(AppError::Domain)?;
        validate_email(&request.email).map_err(AppError::Domain)?;
        validate_password(&request.password).map_err(AppError::Domain)?;

        let session = self
            .api
            .register(RegisterBody {
                username: request.username,
                email: request.email,
                password: request.password,
            })
            .await?;

        let user = session.user.into_user()?;
        self.config.set_session(session.token, user.id)?;
        self.user_repo.mirror_remote(&user)?;

        self.event_bus
            .emit(SessionStarted::new(user.id, user.username.clone()));

        Ok(user)
    }

    /// Forget the session. Purely local: the token simply stops being sent.
    pub fn logout(&self) -> AppResult<()> {
        self.config.clear_session()?;
        self.event_bus.emit(SessionEnded::new());
        Ok(())
    }

    /// The signed-in user's profile.
    /// Remote first, cached row as fallback, error when neither answers.
    pub async fn me(&self) -> AppResult<User> {
        let user_id = self
            .config
            .session_user_id()
            .ok_or(AppError::Unauthorized)?;

        match self.api.get_me().await {
            Ok(payload) => {
                let user = payload.into_user()?;
                self.user_repo.mirror_remote(&user)?;
                Ok(user)
            }
            Err(e) if e.is_remote() => {
                log::warn!("own profile fetch failed, trying cache: {}", e);
                self.user_repo.get_by_id(user_id)?.ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update_profile(&self, request: UpdateProfileRequest) -> AppResult<User> {
        if !self.is_signed_in() {
            return Err(AppError::Unauthorized);
        }

        if let Some(name) = &request.display_name {
            validate_display_name(name).map_err(AppError::Domain)?;
        }
        if let Some(bio) = &request.bio {
            validate_bio(bio).map_err(AppError::Domain)?;
        }

        let payload = self
            .api
            .update_profile(UpdateProfileBody {
                display_name: request.display_name,
                bio: request.bio,
                avatar_url: request.avatar_url,
            })
            .await?;

        let user = payload.into_user()?;
        validate_user(&user).map_err(AppError::Domain)?;
        self.user_repo.mirror_remote(&user)?;

        self.event_bus.emit(ProfileUpdated::new(user.id));

        Ok(user)
    }
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }
}
